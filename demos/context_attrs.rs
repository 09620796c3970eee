//! Context attributes example.
//!
//! Simulates a request passing through several layers. The outer layer adds a request id
//! to the root of every record, inner layers add their own attributes to whatever group
//! the logger is in, and a custom extractor pulls a tenant out of the context.

use ctxlog::json::JsonHandler;
use ctxlog::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Tenant(String);

fn tenant_extractor(ctx: &Context) -> Vec<Attr> {
    match ctx.value::<Tenant>() {
        Some(tenant) => vec![Attr::string("tenant", tenant.0.clone())],
        None => Vec::new(),
    }
}

fn load_cart(logger: &Logger, ctx: &Context) -> ctxlog::Result<()> {
    let ctx = ctx.with_attrs([Attr::string("layer", "storage")]);
    logger
        .with_group("storage")
        .debug_ctx(&ctx, "Loading cart", &[Attr::int("cart_id", 42)])
}

fn handle_request(logger: &Logger, ctx: &Context) -> ctxlog::Result<()> {
    let ctx = ctx.with_attrs([Attr::string("layer", "http")]);
    logger.info_ctx(&ctx, "Request received", &[Attr::string("path", "/cart")])?;

    load_cart(logger, &ctx)?;

    logger.info_ctx(&ctx, "Request complete", &[Attr::int("status", 200)])
}

fn main() -> ctxlog::Result<()> {
    tracing_subscriber::fmt::init();

    println!("ctxlog - context attributes example\n");

    let json = JsonHandler::new(std::io::stdout())
        .with_level(Arc::new(Level::DEBUG))
        .with_source_added(false);
    let handler = ContextHandler::new(Arc::new(json)).with_root_attr_extractor(tenant_extractor);
    let logger = Logger::new(Arc::new(handler)).with(&[Attr::string("service", "shop")]);

    for (request_id, tenant) in [("r-1", "acme"), ("r-2", "globex")] {
        let ctx = Context::background()
            .with_value(Tenant(tenant.to_string()))
            .with_root_attrs([Attr::string("request_id", request_id)]);

        handle_request(&logger, &ctx)?;
        println!();
    }

    Ok(())
}
