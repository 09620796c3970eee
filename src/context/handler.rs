//! Context-aware handler middleware.

use super::extractor::{attrs_extractor, root_attrs_extractor, Extractor};
use super::values::Context;
use crate::attrs::AttrGroupTree;
use crate::error::{LogError, Result};
use crate::handler::{Handler, Record};
use crate::level::Level;
use crate::value::Attr;
use std::sync::Arc;
use tracing::debug;

/// Wraps another [`Handler`], adding attributes carried by the [`Context`] to every record.
///
/// Attributes in the emitted record are ordered as: root extractor attributes, the
/// handler's persistent attributes and groups, the record's own attributes, then the
/// append extractor attributes. All of it is deduplicated before the inner handler sees
/// it, so the inner handler always receives a flat, group-resolved attribute list.
///
/// A new handler already extracts the attributes added with [`Context::with_attrs`] and
/// [`Context::with_root_attrs`].
#[derive(Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
    persistent_attrs: AttrGroupTree,
    attr_extractors: Vec<Arc<dyn Extractor>>,
    root_attr_extractors: Vec<Arc<dyn Extractor>>,
}

impl ContextHandler {
    /// Create a new context handler around `inner`.
    ///
    /// # Arguments
    ///
    /// * `inner` - The handler that receives the resolved records
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        let mut handler = Self {
            inner,
            persistent_attrs: AttrGroupTree::new(),
            attr_extractors: Vec::with_capacity(1),
            root_attr_extractors: Vec::with_capacity(1),
        };

        handler.add_attr_extractors([Arc::new(attrs_extractor()) as Arc<dyn Extractor>]);
        handler.add_root_attr_extractors([Arc::new(root_attrs_extractor()) as Arc<dyn Extractor>]);

        handler
    }

    /// Registers extractors whose attributes are appended to the current group after the
    /// record's own attributes.
    pub fn add_attr_extractors(
        &mut self,
        extractors: impl IntoIterator<Item = Arc<dyn Extractor>>,
    ) {
        self.attr_extractors.extend(extractors);
    }

    /// Registers extractors whose attributes are placed at the front of the root.
    ///
    /// Each root extractor pushes its attributes in front of the previous ones, so the
    /// last registered extractor's attributes come first.
    pub fn add_root_attr_extractors(
        &mut self,
        extractors: impl IntoIterator<Item = Arc<dyn Extractor>>,
    ) {
        self.root_attr_extractors.extend(extractors);
    }

    /// Builder form of [`ContextHandler::add_attr_extractors`] for a single extractor.
    pub fn with_attr_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.attr_extractors.push(Arc::new(extractor));
        self
    }

    /// Builder form of [`ContextHandler::add_root_attr_extractors`] for a single extractor.
    pub fn with_root_attr_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.root_attr_extractors.push(Arc::new(extractor));
        self
    }

    fn with_tree(&self, persistent_attrs: AttrGroupTree) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            persistent_attrs,
            attr_extractors: self.attr_extractors.clone(),
            root_attr_extractors: self.root_attr_extractors.clone(),
        }
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    fn handle(&self, ctx: &Context, record: Record) -> Result<()> {
        let mut record_attrs = record.attrs.clone();
        for extractor in &self.attr_extractors {
            record_attrs.extend(extractor.extract(ctx));
        }

        // Scoped copy so other loggers sharing the tree are unaffected.
        let mut history = self.persistent_attrs.with_attrs(record_attrs).history();

        for extractor in &self.root_attr_extractors {
            let attrs = extractor.extract(ctx);
            if !attrs.is_empty() {
                history.push_front(attrs);
            }
        }

        let mut resolved = record.without_attrs();
        resolved.add_attrs(history.deduplicated_attrs());

        self.inner.handle(ctx, resolved).map_err(|err| {
            debug!("Inner handler rejected record: {}", err);
            LogError::handler(err)
        })
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_group(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Collects records so tests can inspect what reached the inner handler.
    #[derive(Default)]
    struct CapturingHandler {
        records: Mutex<Vec<Record>>,
    }

    impl CapturingHandler {
        fn attrs(&self) -> Vec<Vec<Attr>> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.attrs.clone())
                .collect()
        }
    }

    impl Handler for CapturingHandler {
        fn enabled(&self, level: Level) -> bool {
            level >= Level::INFO
        }

        fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
            unimplemented!("inner handler never receives persistent attrs")
        }

        fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
            unimplemented!("inner handler never receives groups")
        }
    }

    struct ErroringHandler;

    impl Handler for ErroringHandler {
        fn enabled(&self, _level: Level) -> bool {
            true
        }

        fn handle(&self, _ctx: &Context, _record: Record) -> Result<()> {
            Err(LogError::SinkError("some internal error".to_string()))
        }

        fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
            unimplemented!()
        }

        fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
            unimplemented!()
        }
    }

    fn record(attrs: Vec<Attr>) -> Record {
        let mut record = Record::new(Utc::now(), Level::INFO, "Some message");
        record.add_attrs(attrs);
        record
    }

    fn setup() -> (Arc<CapturingHandler>, ContextHandler) {
        let inner = Arc::new(CapturingHandler::default());
        let handler = ContextHandler::new(inner.clone());
        (inner, handler)
    }

    #[test]
    fn test_enabled_delegates_to_inner() {
        let (_, handler) = setup();
        assert!(handler.enabled(Level::WARN));
        assert!(!handler.enabled(Level::DEBUG));
    }

    #[test]
    fn test_record_attrs_pass_through() {
        let (inner, handler) = setup();

        handler
            .handle(&Context::background(), record(vec![Attr::int("a", 1)]))
            .unwrap();

        assert_eq!(inner.attrs(), vec![vec![Attr::int("a", 1)]]);
    }

    #[test]
    fn test_context_attrs_follow_record_attrs_and_root_attrs_lead() {
        let (inner, handler) = setup();
        let ctx = Context::background()
            .with_attrs([Attr::string("append", "v")])
            .with_root_attrs([Attr::string("prepend", "v")]);

        let grouped = handler
            .with_attrs(vec![Attr::int("root", 1)])
            .with_group("g");
        grouped
            .handle(&ctx, record(vec![Attr::string("rec", "v")]))
            .unwrap();

        assert_eq!(
            inner.attrs(),
            vec![vec![
                Attr::string("prepend", "v"),
                Attr::int("root", 1),
                Attr::group(
                    "g",
                    [Attr::string("rec", "v"), Attr::string("append", "v")]
                ),
            ]]
        );
    }

    #[test]
    fn test_context_attrs_deduplicate_against_record_attrs() {
        let (inner, handler) = setup();
        let ctx = Context::background()
            .with_attrs([Attr::string("p1", "v1")])
            .with_root_attrs([Attr::string("p1", "v2")]);

        handler
            .with_attrs(vec![Attr::int("e1", 123)])
            .handle(&ctx, record(vec![Attr::string("p1", "v3")]))
            .unwrap();

        assert_eq!(
            inner.attrs(),
            vec![vec![
                Attr::string("p1", "v2"),
                Attr::int("e1", 123),
                Attr::string("p1#01", "v3"),
                Attr::string("p1#02", "v1"),
            ]]
        );
    }

    #[test]
    fn test_persistent_attrs_do_not_leak_between_handlers() {
        let (inner, handler) = setup();
        let base = handler.with_attrs(vec![Attr::int("shared", 1)]);
        let left = base.with_attrs(vec![Attr::int("left", 1)]);
        let right = base.with_group("right");

        left.handle(&Context::background(), record(Vec::new())).unwrap();
        right
            .handle(&Context::background(), record(vec![Attr::int("r", 2)]))
            .unwrap();
        base.handle(&Context::background(), record(Vec::new())).unwrap();

        assert_eq!(
            inner.attrs(),
            vec![
                vec![Attr::int("shared", 1), Attr::int("left", 1)],
                vec![Attr::int("shared", 1), Attr::group("right", [Attr::int("r", 2)])],
                vec![Attr::int("shared", 1)],
            ]
        );
    }

    #[test]
    fn test_later_root_extractors_come_first() {
        let (inner, handler) = setup();
        let handler = handler
            .with_root_attr_extractor(|_: &Context| vec![Attr::string("first", "1")])
            .with_root_attr_extractor(|_: &Context| vec![Attr::string("second", "2")]);

        let ctx = Context::background().with_root_attrs([Attr::string("ctx", "0")]);
        handler.handle(&ctx, record(Vec::new())).unwrap();

        assert_eq!(
            inner.attrs(),
            vec![vec![
                Attr::string("second", "2"),
                Attr::string("first", "1"),
                Attr::string("ctx", "0"),
            ]]
        );
    }

    #[test]
    fn test_custom_attr_extractor_reads_context_value() {
        struct TraceId(&'static str);

        let (inner, mut handler) = setup();
        handler.add_attr_extractors([Arc::new(|ctx: &Context| match ctx.value::<TraceId>() {
            Some(id) => vec![Attr::string("trace_id", id.0)],
            None => Vec::new(),
        }) as Arc<dyn Extractor>]);

        let ctx = Context::background().with_value(TraceId("t-1"));
        handler.handle(&ctx, record(Vec::new())).unwrap();
        handler.handle(&Context::background(), record(Vec::new())).unwrap();

        assert_eq!(
            inner.attrs(),
            vec![vec![Attr::string("trace_id", "t-1")], Vec::new()]
        );
    }

    #[test]
    fn test_empty_group_without_attrs_is_dropped() {
        let (inner, handler) = setup();

        handler
            .with_group("empty")
            .handle(&Context::background(), record(Vec::new()))
            .unwrap();

        assert_eq!(inner.attrs(), vec![Vec::<Attr>::new()]);
    }

    #[test]
    fn test_returns_error_when_inner_handler_errors() {
        let handler = ContextHandler::new(Arc::new(ErroringHandler));

        let err = handler
            .handle(
                &Context::background(),
                Record::new(Utc::now(), Level::DEBUG, "Some message"),
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "passing record to inner handler: Sink error: some internal error"
        );
        assert!(matches!(err, LogError::HandlerError { .. }));
    }

    #[test]
    fn test_record_metadata_is_kept() {
        let (inner, handler) = setup();
        let original = Record::new(Utc::now(), Level::WARN, "kept");

        handler
            .handle(&Context::background(), original.clone())
            .unwrap();

        let records = inner.records.lock().unwrap();
        assert_eq!(records[0].time, original.time);
        assert_eq!(records[0].level, Level::WARN);
        assert_eq!(records[0].message, "kept");
    }
}
