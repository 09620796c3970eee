//! JSON logger example.
//!
//! Writes JSON lines to stdout showing how persistent attributes, groups and context
//! attributes land in the output. Set `CTXLOG_LEVEL=debug` to see the debug record and
//! `CTXLOG_ADD_SOURCE=false` to drop the source locations.

use ctxlog::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> ctxlog::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("ctxlog - JSON logger example\n");

    let config = LoggerConfig::default()
        .with_writer(std::io::stdout())
        .apply_env_overrides();
    let logger = new_json_logger(config);

    let ctx = Context::background()
        .with_root_attrs([Attr::string("prepend_attribute", "prepend_value")])
        .with_attrs([Attr::string("append_attribute", "append_value")]);

    logger
        .with(&[Attr::int("my_root_attribute", 123)])
        .with_group("my_group")
        .info_ctx(
            &ctx,
            "Info log message",
            &[Attr::string("my_grouped_attribute", "my_value")],
        )?;

    // Colliding keys are kept and suffixed rather than overwritten.
    logger.warn(
        "Slow request",
        &[
            Attr::duration("elapsed", Duration::from_millis(1250)),
            Attr::duration("elapsed", Duration::from_millis(1300)),
        ],
    )?;

    logger.debug("Only shown at debug level", &[])?;

    Ok(())
}
