use crate::err::is_connection_error;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

/// Build a listener with address reuse enabled, so a restarted process can
/// rebind the port without waiting out TIME_WAIT.
pub fn listen(addr: SocketAddr) -> Result<TcpListener, io::Error> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    set_reuseport(&socket);
    socket.bind(addr)?;
    socket.listen(1024)
}

// SO_REUSEPORT is not available on every platform; enable it where tokio
// exposes it and carry on without it elsewhere.
#[cfg(all(unix, not(target_os = "solaris"), not(target_os = "illumos")))]
fn set_reuseport(socket: &TcpSocket) {
    if let Err(e) = socket.set_reuseport(true) {
        log::debug!("SO_REUSEPORT not enabled: {}", e);
    }
}

#[cfg(not(all(unix, not(target_os = "solaris"), not(target_os = "illumos"))))]
fn set_reuseport(_socket: &TcpSocket) {}

pub async fn accept(listener: &mut TcpListener) -> Result<TcpStream, io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) if is_connection_error(&e) => {
                log::debug!("Aborted connection dropped: {}", e)
            }
            Err(e) => return Err(e),
        }
    }
}
