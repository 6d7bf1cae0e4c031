use std::io;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;

/// Trait used in `crate::sht30` to exchange raw bytes with the addressed sensor. Provides
/// only plain writes and reads since the SHT3x command protocol uses no register
/// addressing. Can be replaced with `MockBus` for testing.
pub(crate) trait Bus {
    /// Writes `data` to the device and returns the number of bytes it accepted.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Reads into `buf` and returns the number of bytes the device returned.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl Bus for LinuxI2CDevice {
    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        I2CDevice::write(self, data)?;
        Ok(data.len())
    }

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        I2CDevice::read(self, buf)?;
        Ok(buf.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted bus double. Writes are recorded together with how many bytes the fake
    /// device accepts; reads pop pre-scheduled response frames.
    pub struct MockBus {
        pub last_writes: RefCell<Vec<Vec<u8>>>,
        accept_writes: RefCell<VecDeque<usize>>,
        next_reads: RefCell<VecDeque<Vec<u8>>>,
    }

    impl Bus for MockBus {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.last_writes.borrow_mut().push(data.to_vec());
            match self.accept_writes.borrow_mut().pop_front() {
                Some(n) => Ok(n.min(data.len())),
                None => Ok(data.len()),
            }
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let frame = match self.next_reads.borrow_mut().pop_front() {
                None => return Err(io::Error::from(io::ErrorKind::TimedOut)),
                Some(x) => x,
            };
            let n = frame.len().min(buf.len());
            buf[..n].copy_from_slice(&frame[..n]);
            Ok(n)
        }
    }

    impl MockBus {
        pub fn new() -> Self {
            Self {
                last_writes: RefCell::new(Vec::new()),
                accept_writes: RefCell::new(VecDeque::new()),
                next_reads: RefCell::new(VecDeque::new()),
            }
        }

        /// Schedules the response frame for the next read.
        pub fn schedule_read(&self, frame: &[u8]) {
            self.next_reads.borrow_mut().push_back(frame.to_vec());
        }

        /// Makes the fake device accept only `n` bytes of the next write.
        pub fn accept_next_write(&self, n: usize) {
            self.accept_writes.borrow_mut().push_back(n);
        }

        pub fn pop_write(&self, data: &[u8]) -> bool {
            match self.last_writes.borrow_mut().pop() {
                None => false,
                Some(written) => written == data,
            }
        }

        pub fn has_writes(&self) -> bool {
            !self.last_writes.borrow().is_empty()
        }

        pub fn scheduled_reads(&self) -> usize {
            self.next_reads.borrow().len()
        }
    }
}
