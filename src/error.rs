#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("i2c device error")]
    Bus(#[from] i2cdev::linux::LinuxI2CError),

    #[error("i2c i/o error")]
    Io(#[from] std::io::Error),

    #[error("short write to the i2c bus: device accepted {wrote} of {expected} command bytes")]
    BusWrite { wrote: usize, expected: usize },

    #[error("short read from the i2c bus: got {read} of {expected} bytes")]
    BusRead { read: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
