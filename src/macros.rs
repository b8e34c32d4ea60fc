pub use enclose::*;

#[macro_export]
macro_rules! work {
    (( $($d_tt:tt)* ) $props:ident : $ty:ty => $($b:tt)*) => {
        $crate::macros::enclose!(($( $d_tt )*) move |$props: &$ty| { $($b)* })
    };
    (( $($d_tt:tt)* ) $props:ident => $($b:tt)*) => {
        $crate::macros::enclose!(($( $d_tt )*) move |$props: &_| { $($b)* })
    };
    ($props:ident : $ty:ty => $($b:tt)*) => {
        move |$props: &$ty| { $($b)* }
    };
    ($props:ident => $($b:tt)*) => {
        move |$props: &_| { $($b)* }
    };
}

#[macro_export]
macro_rules! deferred {
    (( $($d_tt:tt)* ) => $($b:tt)*) => {
        $crate::Deferred::new($crate::macros::enclose!(($( $d_tt )*) async move { $($b)* }))
    };
    ($($b:tt)*) => {
        $crate::Deferred::new(async move { $($b)* })
    };
}
