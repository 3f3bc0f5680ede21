use std::ops::{Add, Mul};

pub fn double<T>(x: T) -> T
where
    T: Mul<Output = T> + From<u8>,
{
    T::from(2) * x
}

pub fn add_one<T>(x: T) -> T
where
    T: Add<Output = T> + From<u8>,
{
    x + T::from(1)
}
