//! Raw L2 socket abstraction. Production code talks to an `AF_PACKET`/`SOCK_RAW`
//! socket bound to the 1905 EtherType (§4.4); tests substitute [`FakeSocket`] so
//! the dispatcher's logic can be exercised without root or a real NIC.

use crate::codec::macaddr::MacAddr;
use std::collections::VecDeque;
use std::io;
use thiserror::Error;

pub const ETHERTYPE_1905: u16 = 0x893a;

#[derive(Debug, Error)]
pub enum DriverSocketError {
    #[error("socket would block")]
    WouldBlock,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: u16,
    pub payload: Vec<u8>,
}

/// A raw link-layer socket bound to one interface.
pub trait RawSocket {
    fn send(&mut self, frame: &Frame) -> Result<(), DriverSocketError>;

    /// Non-blocking receive. `Ok(None)` means no frame is currently available
    /// (the `EAGAIN`/`EWOULDBLOCK` case), which the dispatcher's poll loop treats
    /// the same as an empty queue rather than an error.
    fn recv(&mut self) -> Result<Option<Frame>, DriverSocketError>;

    fn local_mac(&self) -> MacAddr;
}

/// An in-memory [`RawSocket`] used by tests and by the integration scenarios in
/// `tests/`. `inbox` is fed by the test harness; `outbox` is drained by it to
/// assert on what the dispatcher sent.
pub struct FakeSocket {
    local_mac: MacAddr,
    inbox: VecDeque<Frame>,
    pub outbox: VecDeque<Frame>,
    scripted_failures: u32,
}

impl FakeSocket {
    pub fn new(local_mac: MacAddr) -> Self {
        FakeSocket {
            local_mac,
            inbox: VecDeque::new(),
            outbox: VecDeque::new(),
            scripted_failures: 0,
        }
    }

    pub fn push_inbound(&mut self, frame: Frame) {
        self.inbox.push_back(frame);
    }

    /// Makes the next `send()` call (and, if called again, each call after
    /// that) fail with `WouldBlock` instead of succeeding.
    pub fn fail_next_send(&mut self) {
        self.scripted_failures += 1;
    }
}

impl RawSocket for FakeSocket {
    fn send(&mut self, frame: &Frame) -> Result<(), DriverSocketError> {
        if self.scripted_failures > 0 {
            self.scripted_failures -= 1;
            return Err(DriverSocketError::WouldBlock);
        }
        self.outbox.push_back(frame.clone());
        Ok(())
    }

    fn recv(&mut self) -> Result<Option<Frame>, DriverSocketError> {
        Ok(self.inbox.pop_front())
    }

    fn local_mac(&self) -> MacAddr {
        self.local_mac
    }
}

#[cfg(unix)]
pub use unix_socket::AfPacketSocket;

#[cfg(unix)]
mod unix_socket {
    use super::*;
    use std::os::unix::io::RawFd;

    /// An `AF_PACKET`/`SOCK_RAW` socket bound to a single interface and the 1905
    /// EtherType, opened with `libc::socket`/`bind` directly the way the teacher's
    /// lower layers reach for `libc` rather than a higher-level crate for kernel
    /// socket options it needs exact control over.
    pub struct AfPacketSocket {
        fd: RawFd,
        local_mac: MacAddr,
    }

    impl AfPacketSocket {
        pub fn bind(if_name: &str, local_mac: MacAddr) -> io::Result<Self> {
            let fd = unsafe {
                libc::socket(
                    libc::AF_PACKET,
                    libc::SOCK_RAW | libc::SOCK_NONBLOCK,
                    (ETHERTYPE_1905 as i32).to_be(),
                )
            };
            if fd < 0 {
                return Err(io::Error::last_os_error());
            }
            let if_index = if_name_to_index(if_name)?;
            let mut addr: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
            addr.sll_family = libc::AF_PACKET as u16;
            addr.sll_protocol = (ETHERTYPE_1905 as u16).to_be();
            addr.sll_ifindex = if_index;
            let rc = unsafe {
                libc::bind(
                    fd,
                    &addr as *const _ as *const libc::sockaddr,
                    std::mem::size_of::<libc::sockaddr_ll>() as u32,
                )
            };
            if rc < 0 {
                let err = io::Error::last_os_error();
                unsafe { libc::close(fd) };
                return Err(err);
            }
            Ok(AfPacketSocket { fd, local_mac })
        }
    }

    fn if_name_to_index(if_name: &str) -> io::Result<i32> {
        let c_name = std::ffi::CString::new(if_name)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "interface name contains NUL"))?;
        let idx = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
        if idx == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(idx as i32)
    }

    impl RawSocket for AfPacketSocket {
        fn send(&mut self, frame: &Frame) -> Result<(), DriverSocketError> {
            let mut buf = Vec::with_capacity(14 + frame.payload.len());
            buf.extend_from_slice(&frame.destination);
            buf.extend_from_slice(&frame.source);
            buf.extend_from_slice(&frame.ethertype.to_be_bytes());
            buf.extend_from_slice(&frame.payload);
            let rc = unsafe { libc::write(self.fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::WouldBlock {
                    return Err(DriverSocketError::WouldBlock);
                }
                return Err(DriverSocketError::Io(err));
            }
            Ok(())
        }

        fn recv(&mut self) -> Result<Option<Frame>, DriverSocketError> {
            let mut buf = [0u8; 1518];
            let rc = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::WouldBlock {
                    return Ok(None);
                }
                return Err(DriverSocketError::Io(err));
            }
            if (rc as usize) < 14 {
                return Ok(None);
            }
            let mut destination = [0u8; 6];
            let mut source = [0u8; 6];
            destination.copy_from_slice(&buf[0..6]);
            source.copy_from_slice(&buf[6..12]);
            let ethertype = u16::from_be_bytes([buf[12], buf[13]]);
            let payload = buf[14..rc as usize].to_vec();
            Ok(Some(Frame {
                destination,
                source,
                ethertype,
                payload,
            }))
        }

        fn local_mac(&self) -> MacAddr {
            self.local_mac
        }
    }

    impl Drop for AfPacketSocket {
        fn drop(&mut self) {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
