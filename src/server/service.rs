use super::request::parse_request;
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::Dispatcher;
use crate::handler::HandlerResponse;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// The hosting service: receives every inbound HTTP request and runs it
/// through the front controller.
///
/// Cloned once per connection by the server; all clones share the same
/// dispatcher (and through it the same route table snapshot).
#[derive(Clone)]
pub struct AppService {
    dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let mut handler_res = HandlerResponse::new();

        match self.dispatcher.dispatch(&parsed, &mut handler_res) {
            Ok(()) => write_handler_response(res, handler_res),
            Err(err) => {
                // Failure detail was already logged at the appropriate level
                // by the dispatcher; the client only sees the status and a
                // generic message.
                let status = err.status();
                debug!(status = status, method = %parsed.method, path = %parsed.path, "Dispatch failed");
                write_json_error(
                    res,
                    status,
                    json!({
                        "error": err.public_message(),
                        "method": parsed.method.as_str(),
                        "path": parsed.path,
                    }),
                );
            }
        }
        Ok(())
    }
}
