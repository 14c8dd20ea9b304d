//! Request dispatch
//!
//! Matches a request against the route table, runs the handler and
//! converts every failure into an error envelope. `dispatch` always
//! returns exactly one complete `Reply`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;

use super::context::RequestContext;
use super::envelope::Reply;
use super::errors;
use crate::config::ServiceInfo;
use crate::error::{HandlerFault, HandlerResult};
use crate::logger::Logger;
use crate::routing::{Route, RouteTable};

/// Route and answer a single request
pub fn dispatch(
    routes: &RouteTable,
    info: &ServiceInfo,
    logger: &dyn Logger,
    ctx: &RequestContext<'_>,
) -> Reply {
    let Some(route) = routes.lookup(ctx.method, ctx.path) else {
        return errors::not_found(ctx.method, ctx.path, info, logger, Utc::now());
    };

    if route.log_activity {
        logger.info(&format!(
            "{}: Received {} request to {}",
            info.name, ctx.method, ctx.path
        ));
    }

    match run_handler(route, ctx, info) {
        Ok(envelope) => {
            let reply = Reply::ok(envelope);
            if route.log_activity {
                logger.info(&format!(
                    "{}: Sending response: {}",
                    info.name,
                    reply.field("message").unwrap_or_default()
                ));
            }
            reply
        }
        Err(fault) => errors::internal_error(route, &fault, info, logger, Utc::now()),
    }
}

/// Invoke the handler, folding a panic into a fault
fn run_handler(
    route: &Route,
    ctx: &RequestContext<'_>,
    info: &ServiceInfo,
) -> HandlerResult<super::Envelope> {
    // The timestamp is taken right before the envelope is built
    panic::catch_unwind(AssertUnwindSafe(|| (route.handler)(ctx, info, Utc::now())))
        .unwrap_or_else(|payload| Err(HandlerFault::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
