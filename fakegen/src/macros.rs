/// Define fake functions.
///
/// Every item defines the function itself and a module of the same name
/// holding its recorded state:
///
/// ```
/// fakegen::fake! {
///     pub fn read_sensor(channel: u8) -> i32;
///     pub fn set_led(on: bool);
/// }
///
/// # fn main() {
/// read_sensor::with(|fake| fake.set_return_seq([10, 20]));
/// assert_eq!(read_sensor(1), 10);
/// assert_eq!(read_sensor(2), 20);
/// assert_eq!(read_sensor(3), 20);
/// set_led(true);
///
/// read_sensor::with(|fake| {
///     assert_eq!(fake.call_count(), 3);
///     assert_eq!(fake.arg_val(), Some(&(3,)));
/// });
/// assert_eq!(fakegen::call_history(), ["read_sensor", "read_sensor", "read_sensor", "set_led"]);
/// fakegen::reset_fake!(read_sensor, set_led);
/// # }
/// ```
///
/// The module exposes `Args` and `Return` aliases, the thread-local `FAKE`
/// state, `reset()` and `with(|fake| ...)`.
///
/// An optional leading `history_len = N;` sets the history capacity of every
/// fake in the block. Attributes are forwarded to the function, which is how
/// C-ABI fakes get exported:
///
/// ```
/// # use std::ffi::{c_char, c_int};
/// fakegen::fake! {
///     history_len = 8;
///     #[unsafe(no_mangle)]
///     pub extern "C" fn fakegen_doc_flush(fd: c_int) -> c_int;
///     pub extern "C" fn fakegen_doc_log(fmt: *const c_char, ...);
/// }
/// # fn main() {
/// # assert_eq!(fakegen_doc_flush::with(|fake| fake.arg_history_len()), 8);
/// # }
/// ```
///
/// A trailing `...` declares a variadic fake: the function takes an extra
/// [`VaList`](crate::VaList) argument, filled in by the C shim that
/// [`FakeGenerator`](crate::FakeGenerator) emits. Invoke at module level, the
/// state module resolves parameter types through `use super::*`.
///
/// Parameter names starting with `fakegen_` are reserved for generated code.
#[macro_export]
macro_rules! fake {
    (history_len = $len:expr; $($items:tt)*) => {
        $crate::__fake_items! { [$len] $($items)* }
    };
    ($($items:tt)*) => {
        $crate::__fake_items! { [$crate::ARG_HISTORY_LEN] $($items)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __fake_items {
    ([$len:expr]) => {};
    (
        [$len:expr]
        $(#[$($attr:tt)*])*
        $vis:vis $(extern $abi:literal)? fn $name:ident($($arg:ident : $ty:ty),+ , ... $(,)?) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::__fake_fn! {
            [$len] [$(#[$($attr)*])*] [$vis] [$($abi)?] $name
            [$($arg: $ty,)+ fakegen_va_list: $crate::VaList] [$($ret)?]
        }
        $crate::__fake_items! { [$len] $($rest)* }
    };
    (
        [$len:expr]
        $(#[$($attr:tt)*])*
        $vis:vis $(extern $abi:literal)? fn $name:ident($($arg:ident : $ty:ty),* $(,)?) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::__fake_fn! {
            [$len] [$(#[$($attr)*])*] [$vis] [$($abi)?] $name
            [$($arg: $ty,)*] [$($ret)?]
        }
        $crate::__fake_items! { [$len] $($rest)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __fake_fn {
    (
        [$len:expr] [$($attr:tt)*] [$vis:vis] [$($abi:literal)?] $name:ident
        [$($arg:ident : $ty:ty),* $(,)?] []
    ) => {
        $crate::__fake_fn! {
            [$len] [$($attr)*] [$vis] [$($abi)?] $name
            [$($arg: $ty),*] [()]
        }
    };
    (
        [$len:expr] [$($attr:tt)*] [$vis:vis] [$($abi:literal)?] $name:ident
        [$($arg:ident : $ty:ty),* $(,)?] [$ret:ty]
    ) => {
        $($attr)*
        #[allow(clippy::too_many_arguments, clippy::unused_unit)]
        $vis $(extern $abi)? fn $name($($arg: $ty),*) -> $ret {
            $name::invoke(($($arg,)*))
        }

        #[doc = ::std::concat!("Recorded state of the `", ::std::stringify!($name), "` fake.")]
        #[allow(dead_code)]
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            const _: () = ::std::assert!(
                <[&str]>::len(&[$(::std::stringify!($arg)),*]) <= $crate::MAX_ARGS,
                "fakes take at most 20 parameters"
            );

            pub type Args = ($($ty,)*);
            pub type Return = $ret;

            ::std::thread_local! {
                pub static FAKE: ::std::cell::RefCell<$crate::Fake<Args, Return>> =
                    ::std::cell::RefCell::new($crate::Fake::with_history_len(
                        ::std::stringify!($name),
                        $len,
                    ));
            }

            /// Restore the zero state.
            pub fn reset() {
                FAKE.with_borrow_mut(|fake| fake.reset());
            }

            /// Arm or inspect the fake.
            pub fn with<T>(f: impl FnOnce(&mut $crate::Fake<Args, Return>) -> T) -> T {
                FAKE.with_borrow_mut(f)
            }

            pub(super) fn invoke(args: Args) -> Return {
                $crate::invoke(&FAKE, args)
            }
        }
    };
}

/// Program the return values of a fake, see [`Fake::set_return_seq`](crate::Fake::set_return_seq).
#[macro_export]
macro_rules! set_return_seq {
    ($($name:ident)::+, $seq:expr $(,)?) => {
        $($name)::+::with(|fake| fake.set_return_seq($seq))
    };
}

/// Program a sequence of closures a fake delegates to, see
/// [`Fake::set_custom_fake_seq`](crate::Fake::set_custom_fake_seq).
#[macro_export]
macro_rules! set_custom_fake_seq {
    ($($name:ident)::+, [$($f:expr),* $(,)?] $(,)?) => {
        $($name)::+::with(|fake| {
            let seq = ::std::vec![$($crate::boxed_fake(&*fake, $f)),*];
            fake.set_custom_fake_seq(seq)
        })
    };
}

/// Reset the listed fakes.
#[macro_export]
macro_rules! reset_fake {
    ($($($name:ident)::+),+ $(,)?) => {
        $($($name)::+::reset();)+
    };
}
