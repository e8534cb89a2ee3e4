use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use netcfg_config::SocketEndpoint;
use rstest::{fixture, rstest};

use super::{ConnectionHandler, ConnectionStream, ListenerError, SocketListener};

/// Counts connections and answers each with a fixed line.
#[derive(Default)]
struct CountingHandler {
    count: AtomicUsize,
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, mut stream: ConnectionStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
        let _ = stream.write_all(b"OK\n");
        let _ = stream.close();
    }
}

fn wait_for_count(handler: &CountingHandler, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if handler.count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[fixture]
fn handler() -> Arc<CountingHandler> {
    Arc::new(CountingHandler::default())
}

#[rstest]
fn tcp_listener_serves_each_connection(handler: Arc<CountingHandler>) {
    let listener = SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind tcp");
    let addr = listener.local_addr().expect("tcp address");
    let handle = listener
        .start(Arc::clone(&handler) as Arc<dyn ConnectionHandler>)
        .expect("start listener");

    for _ in 0..2 {
        let mut client = TcpStream::connect(addr).expect("connect");
        let mut reply = String::new();
        client.read_to_string(&mut reply).expect("reply");
        assert_eq!(reply, "OK\n");
    }

    assert!(wait_for_count(&handler, 2), "expected two connections");
    handle.shutdown();
    handle.join().expect("join listener");
}

#[cfg(unix)]
mod unix {
    use std::os::unix::net::{UnixListener, UnixStream};

    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn socket_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn endpoint(path: &std::path::Path) -> SocketEndpoint {
        SocketEndpoint::unix(path.to_str().expect("utf8 path"))
    }

    #[rstest]
    fn stale_socket_is_replaced_and_removed(socket_dir: TempDir, handler: Arc<CountingHandler>) {
        let path = socket_dir.path().join("netcfgd.sock");
        drop(UnixListener::bind(&path).expect("bind stale listener"));
        assert!(path.exists(), "stale socket should remain");

        let listener = SocketListener::bind(&endpoint(&path)).expect("bind over stale socket");
        let handle = listener
            .start(Arc::clone(&handler) as Arc<dyn ConnectionHandler>)
            .expect("start listener");
        UnixStream::connect(&path).expect("connect unix client");
        assert!(wait_for_count(&handler, 1), "expected one connection");

        handle.shutdown();
        handle.join().expect("join listener");
        assert!(!path.exists(), "listener should remove its socket on shutdown");
    }

    #[rstest]
    fn live_socket_is_in_use(socket_dir: TempDir) {
        let path = socket_dir.path().join("netcfgd.sock");
        let _existing = UnixListener::bind(&path).expect("bind existing listener");
        let error = SocketListener::bind(&endpoint(&path)).expect_err("in use");
        assert!(matches!(error, ListenerError::UnixInUse { .. }));
    }

    #[rstest]
    fn regular_file_is_not_replaced(socket_dir: TempDir) {
        let path = socket_dir.path().join("netcfgd.sock");
        std::fs::write(&path, b"not a socket").expect("write file");
        let error = SocketListener::bind(&endpoint(&path)).expect_err("not a socket");
        assert!(matches!(error, ListenerError::UnixNotSocket { .. }));
        assert!(path.is_file());
    }
}
