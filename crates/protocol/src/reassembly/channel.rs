use std::io;

/// Byte-level transport driven by [`ResponseReassembler`](super::ResponseReassembler).
///
/// Implementations wrap a connected stream. The reassembler never assumes a
/// frame length; it relies on [`bytes_available_now`](Self::bytes_available_now)
/// to learn how much the peer has already delivered.
pub trait BurstChannel {
    /// Returns the number of bytes that can be read without blocking.
    ///
    /// Must not wait for the peer. Zero means nothing is buffered yet.
    fn bytes_available_now(&mut self) -> io::Result<usize>;

    /// Reads into `buf`, blocking until at least one byte arrives, the stream
    /// ends (`Ok(0)`), or the read deadline elapses.
    ///
    /// A deadline expiry surfaces as [`io::ErrorKind::TimedOut`] or
    /// [`io::ErrorKind::WouldBlock`], matching what `std::net::TcpStream`
    /// reports on the supported platforms.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes every byte of `bytes` and flushes before returning.
    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<T> BurstChannel for &mut T
where
    T: BurstChannel + ?Sized,
{
    fn bytes_available_now(&mut self) -> io::Result<usize> {
        (**self).bytes_available_now()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all_and_flush(bytes)
    }
}

impl<T> BurstChannel for Box<T>
where
    T: BurstChannel + ?Sized,
{
    fn bytes_available_now(&mut self) -> io::Result<usize> {
        (**self).bytes_available_now()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write_all_and_flush(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all_and_flush(bytes)
    }
}
