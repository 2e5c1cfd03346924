/// The value a fake returns before anything else is programmed.
///
/// Raw pointers are null, numbers are zero and containers are empty. Types
/// that are `Default` can opt in with [`zero_value_via_default!`](crate::zero_value_via_default).
pub trait ZeroValue {
    /// The zero value of the type.
    fn zero() -> Self;
}

macro_rules! z {
    ($($i:ident)*) => ($(
        impl ZeroValue for $i {
            fn zero() -> Self {
                0 as $i
            }
        }
    )*)
}
z! { i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize f32 f64 }

impl ZeroValue for () {
    fn zero() -> Self {}
}

impl ZeroValue for bool {
    fn zero() -> Self {
        false
    }
}

impl ZeroValue for char {
    fn zero() -> Self {
        '\0'
    }
}

impl<T> ZeroValue for *const T {
    fn zero() -> Self {
        std::ptr::null()
    }
}

impl<T> ZeroValue for *mut T {
    fn zero() -> Self {
        std::ptr::null_mut()
    }
}

impl<T> ZeroValue for Option<T> {
    fn zero() -> Self {
        None
    }
}

impl ZeroValue for String {
    fn zero() -> Self {
        String::new()
    }
}

impl<T> ZeroValue for Vec<T> {
    fn zero() -> Self {
        Vec::new()
    }
}

impl ZeroValue for &'static str {
    fn zero() -> Self {
        ""
    }
}

impl<T> ZeroValue for &'static [T] {
    fn zero() -> Self {
        &[]
    }
}

/// Implement [`ZeroValue`] through `Default` for the listed types.
#[macro_export]
macro_rules! zero_value_via_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ZeroValue for $ty {
                fn zero() -> Self {
                    <$ty as ::std::default::Default>::default()
                }
            }
        )+
    };
}
