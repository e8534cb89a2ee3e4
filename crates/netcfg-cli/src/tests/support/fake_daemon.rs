//! A one-shot daemon answering a single connection with a canned response.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

pub(in crate::tests) struct FakeDaemon {
    port: u16,
    handle: Option<thread::JoinHandle<Result<String>>>,
}

impl FakeDaemon {
    /// Listens on an ephemeral loopback port and replies with `response`
    /// once the client half-closes its side.
    pub(in crate::tests) fn spawn(response: &str) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("fake daemon nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let response = response.to_owned();
        let handle = thread::spawn(move || serve(&listener, &response));
        Ok(Self {
            port,
            handle: Some(handle),
        })
    }

    pub(in crate::tests) fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the exchange and returns the raw request text.
    pub(in crate::tests) fn take_request(&mut self) -> Result<String> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("request already taken"))?;
        handle
            .join()
            .map_err(|_| anyhow!("fake daemon thread panicked"))?
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(listener: &TcpListener, response: &str) -> Result<String> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match listener.accept() {
            Ok((stream, _)) => return exchange(stream, response),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    // The CLI gave up before connecting.
                    return Ok(String::new());
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(error) => return Err(error).context("accept connection"),
        }
    }
}

fn exchange(mut stream: TcpStream, response: &str) -> Result<String> {
    stream
        .set_nonblocking(false)
        .context("blocking fake daemon stream")?;
    let mut request = String::new();
    stream
        .read_to_string(&mut request)
        .context("read request")?;
    stream
        .write_all(response.as_bytes())
        .context("write response")?;
    Ok(request)
}
