use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Canned HTTP/1.1 response with `Connection: close`.
#[must_use]
pub fn response(status_line: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        content_type,
        body.len(),
        body
    )
}

/// Routes for an API that answers every suite step successfully.
#[must_use]
pub fn healthy_routes() -> Vec<(&'static str, String)> {
    vec![
        ("GET /", response("200 OK", "text/plain", "ok")),
        (
            "POST /submit",
            response("201 Created", "application/json", r#"{"id":"e2e-1"}"#),
        ),
        (
            "POST /analytics",
            response("200 OK", "application/json", r#"{"totals":3}"#),
        ),
        (
            "POST /export",
            response("200 OK", "text/csv", "form_id,email\nmy-portfolio,a@b.c\n"),
        ),
    ]
}

/// Spawn an HTTP server answering `METHOD /path` routes; anything else is 404.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_api_server(
    routes: Vec<(&'static str, String)>,
) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => handle_client(stream, &routes),
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Like [`spawn_api_server`], but skips when sockets are not permitted.
///
/// # Errors
///
/// Returns an error for any failure other than a sandbox denial.
pub fn spawn_api_server_or_skip(
    routes: Vec<(&'static str, String)>,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_api_server(routes) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, routes: &[(&'static str, String)]) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let route = request
        .lines()
        .next()
        .and_then(|line| line.rsplit_once(' '))
        .map(|(route, _version)| route.to_owned())
        .unwrap_or_default();
    let not_found = response("404 Not Found", "text/plain", "no route");
    let reply = routes
        .iter()
        .find(|(key, _)| *key == route)
        .map_or(not_found.as_str(), |(_, reply)| reply.as_str());
    if stream.write_all(reply.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut raw: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let text = String::from_utf8_lossy(&raw).into_owned();
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let expected = head
                .lines()
                .find_map(|line| {
                    line.split_once(':')
                        .filter(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if body.len() >= expected {
                return Some(text);
            }
        }
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        raw.extend_from_slice(chunk.get(..read)?);
    }
}

/// Run the `stepcheck` binary in `cwd` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_stepcheck<I, S>(cwd: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = stepcheck_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .env_remove("STEPCHECK_LOG")
        .env_remove("STEPCHECK_BASE_URL")
        .env_remove("STEPCHECK_API_KEY")
        .env_remove("STEPCHECK_HMAC_SECRET")
        .env_remove("STEPCHECK_FORM_ID")
        .output()
        .map_err(|err| format!("run stepcheck failed: {}", err))
}

/// Formats captured output for assertion messages.
#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn stepcheck_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_stepcheck").map_or_else(
        || Err("CARGO_BIN_EXE_stepcheck missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
