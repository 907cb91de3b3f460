//! End-to-end tests for the HTTP serving boundary
//!
//! Starts a real `may_minihttp` server around a representative application
//! routing table (boards, dictionary, Q&A, user, upload/download) and
//! exercises the full pipeline: raw request → parse → resolve → verb
//! dispatch → response, including every failure status.

use portico::{AppService, Dispatcher, Handler, HandlerRequest, HandlerResponse, HttpServer,
    RouteTable, ServerHandle};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

fn init_test_env() {
    INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn page(name: &'static str) -> impl Fn(&HandlerRequest, &mut HandlerResponse) -> anyhow::Result<()>
{
    move |_req: &HandlerRequest, res: &mut HandlerResponse| {
        res.html(format!("<h1>{name}</h1>"));
        Ok(())
    }
}

fn app_mappings() -> HashMap<String, Arc<Handler>> {
    let board = Arc::new(
        Handler::new("board")
            .on_get(page("board"))
            .on_post(|req, res| {
                let title = req.get_form_param("title").unwrap_or("untitled");
                res.set_header("X-Created-Title", title.to_string());
                if let Some(session) = req.get_cookie("session") {
                    res.set_header("X-Session", session.to_string());
                }
                res.redirect("/board");
                Ok(())
            }),
    );
    let dictionary = Arc::new(Handler::new("dictionary").on_get(page("dictionary")));
    let qna = Arc::new(Handler::new("qna").on_get(page("qna")));
    let user = Arc::new(Handler::new("user").on_get(page("user")));
    // Registered for GET traffic it cannot serve: exercises the 500
    // configuration-error path.
    let upload = Arc::new(Handler::new("upload").on_post(|_req, res| {
        res.redirect("/board");
        Ok(())
    }));
    let crash = Arc::new(Handler::new("crash").on_get(|_req, _res| panic!("boom")));

    let mut mappings: HashMap<String, Arc<Handler>> = HashMap::new();
    mappings.insert("/board".to_string(), Arc::clone(&board));
    mappings.insert("/board/*".to_string(), board);
    mappings.insert("/dictionary".to_string(), Arc::clone(&dictionary));
    mappings.insert("/dictionary/*".to_string(), dictionary);
    mappings.insert("/qna".to_string(), qna);
    mappings.insert("/user".to_string(), Arc::clone(&user));
    mappings.insert("/user/*".to_string(), user);
    mappings.insert("/upload".to_string(), upload);
    mappings.insert("/crash".to_string(), crash);
    mappings
}

fn start_service() -> (ServerHandle, SocketAddr) {
    init_test_env();

    let mut routes = RouteTable::new();
    routes.initialize(app_mappings());
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(routes)));
    let service = AppService::new(dispatcher);

    // Bind to port 0 to pick a free port, then hand the address to the server.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let handle = HttpServer(service).start(addr).unwrap();
    handle.wait_ready().unwrap();
    (handle, addr)
}

fn send_request(addr: &SocketAddr, req: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(req.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                break
            }
            Err(e) => panic!("read error: {e:?}"),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn status_of(resp: &str) -> u16 {
    resp.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap_or(0)
}

fn body_of(resp: &str) -> &str {
    resp.split("\r\n\r\n").nth(1).unwrap_or("")
}

#[test]
fn test_full_request_lifecycle() {
    let (handle, addr) = start_service();

    // Exact match.
    let resp = send_request(
        &addr,
        "GET /qna HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 200);
    assert!(body_of(&resp).contains("qna"));

    // Wildcard fallback, one segment below the registered prefix.
    let resp = send_request(
        &addr,
        "GET /board/view?id=5 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 200);
    assert!(body_of(&resp).contains("board"));

    // No /qna/* registered: one level of fallback is not available here.
    let resp = send_request(
        &addr,
        "GET /qna/write HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 404);

    // Unknown prefix entirely.
    let resp = send_request(
        &addr,
        "GET /totally/unknown HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 404);
    assert!(body_of(&resp).contains("Not Found"));

    handle.stop();
}

#[test]
fn test_post_form_and_redirect() {
    let (handle, addr) = start_service();

    let body = "title=first+post";
    let req = format!(
        "POST /board HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nCookie: session=abc123\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let resp = send_request(&addr, &req);
    assert_eq!(status_of(&resp), 302);
    assert!(resp.contains("Location: /board"));
    assert!(resp.contains("X-Created-Title: first post"));
    assert!(resp.contains("X-Session: abc123"));

    handle.stop();
}

#[test]
fn test_unrecognized_verb_is_405() {
    let (handle, addr) = start_service();

    let resp = send_request(
        &addr,
        "DELETE /board/view HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 405);
    assert!(body_of(&resp).contains("Method Not Allowed"));

    handle.stop();
}

#[test]
fn test_server_survives_configuration_error_and_panic() {
    let (handle, addr) = start_service();

    // /upload only implements POST; GET is a registration defect → 500.
    let resp = send_request(
        &addr,
        "GET /upload HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 500);
    assert!(body_of(&resp).contains("Internal Server Error"));

    // A panicking handler is also contained to its request.
    let resp = send_request(
        &addr,
        "GET /crash HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 500);

    // The process keeps serving afterwards.
    let resp = send_request(
        &addr,
        "GET /dictionary HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert_eq!(status_of(&resp), 200);
    assert!(body_of(&resp).contains("dictionary"));

    handle.stop();
}
