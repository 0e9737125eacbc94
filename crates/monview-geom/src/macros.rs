#[macro_export]
macro_rules! impl_index_newtype {
    ($name:ty) => {
        impl $name {
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}
