//! Argument application and partial application over tuple argument lists.
//!
//! Argument lists are tuples. [`ApplyArgs`] spreads a tuple into positional
//! parameters, [`Concat`] joins two tuples, and [`Curried`] fixes a prefix of
//! arguments ahead of the ones supplied at call time.
//!
//! # Examples
//!
//! ```
//! use whenthen::curry::{apply_args, curry};
//!
//! let volume = |w: u32, h: u32, d: u32| w * h * d;
//! assert_eq!(apply_args(volume, (2, 3, 4)), 24);
//!
//! let flat = curry(volume, (2, 3));
//! assert_eq!(flat.call((1,)), 6);
//! assert_eq!(flat.call((5,)), 30);
//! ```

/// Functions callable with the elements of `Args` as positional arguments.
///
/// Implemented for every [`FnOnce`] taking up to six parameters.
pub trait ApplyArgs<Args> {
    /// Return type of the function.
    type Output;

    /// Calls the function with `args` spread into positional parameters.
    fn apply_args(self, args: Args) -> Self::Output;
}

macro_rules! impl_apply_args {
    ($($ty:ident $value:ident),*) => {
        impl<Func, Ret, $($ty,)*> ApplyArgs<($($ty,)*)> for Func
        where
            Func: FnOnce($($ty),*) -> Ret,
        {
            type Output = Ret;

            fn apply_args(self, args: ($($ty,)*)) -> Ret {
                let ($($value,)*) = args;
                self($($value),*)
            }
        }
    };
}

impl_apply_args!();
impl_apply_args!(T1 t1);
impl_apply_args!(T1 t1, T2 t2);
impl_apply_args!(T1 t1, T2 t2, T3 t3);
impl_apply_args!(T1 t1, T2 t2, T3 t3, T4 t4);
impl_apply_args!(T1 t1, T2 t2, T3 t3, T4 t4, T5 t5);
impl_apply_args!(T1 t1, T2 t2, T3 t3, T4 t4, T5 t5, T6 t6);

/// Tuples that can be extended with the elements of `Rest`.
///
/// Implemented for every pair of tuples whose combined length is at most six.
///
/// # Examples
///
/// ```
/// use whenthen::curry::Concat;
///
/// assert_eq!((1, "two").concat((3.0,)), (1, "two", 3.0));
/// assert_eq!(().concat((7,)), (7,));
/// ```
pub trait Concat<Rest> {
    /// The concatenated tuple.
    type Output;

    /// Appends the elements of `rest` after the elements of `self`.
    fn concat(self, rest: Rest) -> Self::Output;
}

macro_rules! impl_concat {
    ([$($head:ident $head_value:ident),*] [$($tail:ident $tail_value:ident),*]) => {
        impl<$($head,)* $($tail,)*> Concat<($($tail,)*)> for ($($head,)*) {
            type Output = ($($head,)* $($tail,)*);

            fn concat(self, rest: ($($tail,)*)) -> Self::Output {
                let ($($head_value,)*) = self;
                let ($($tail_value,)*) = rest;
                ($($head_value,)* $($tail_value,)*)
            }
        }
    };
}

// Emits one `Concat` impl per split point of the given element list.
macro_rules! impl_concat_splits {
    ([$($head:ident $head_value:ident),*] []) => {
        impl_concat!([$($head $head_value),*] []);
    };
    (
        [$($head:ident $head_value:ident),*]
        [$next:ident $next_value:ident $(, $tail:ident $tail_value:ident)*]
    ) => {
        impl_concat!(
            [$($head $head_value),*]
            [$next $next_value $(, $tail $tail_value)*]
        );
        impl_concat_splits!(
            [$($head $head_value,)* $next $next_value]
            [$($tail $tail_value),*]
        );
    };
}

impl_concat_splits!([] []);
impl_concat_splits!([] [T1 t1]);
impl_concat_splits!([] [T1 t1, T2 t2]);
impl_concat_splits!([] [T1 t1, T2 t2, T3 t3]);
impl_concat_splits!([] [T1 t1, T2 t2, T3 t3, T4 t4]);
impl_concat_splits!([] [T1 t1, T2 t2, T3 t3, T4 t4, T5 t5]);
impl_concat_splits!([] [T1 t1, T2 t2, T3 t3, T4 t4, T5 t5, T6 t6]);

/// Calls `func` with the elements of `args` as positional arguments and
/// returns its result unchanged.
///
/// # Examples
///
/// ```
/// use whenthen::curry::apply_args;
///
/// let label = apply_args(|name: &str, id: u8| format!("{name}#{id}"), ("worker", 3));
/// assert_eq!(label, "worker#3");
/// ```
pub fn apply_args<F, Args>(func: F, args: Args) -> F::Output
where
    F: ApplyArgs<Args>,
{
    func.apply_args(args)
}

/// Calls `func` with `this` as the leading argument followed by the elements
/// of `args`.
///
/// # Examples
///
/// ```
/// use whenthen::curry::apply_args_on;
///
/// let mut totals = Vec::new();
/// apply_args_on(|acc: &mut Vec<u32>, a: u32, b: u32| acc.push(a + b), &mut totals, (2, 5));
/// assert_eq!(totals, vec![7]);
/// ```
pub fn apply_args_on<T, F, Args, R>(func: F, this: T, args: Args) -> R
where
    (T,): Concat<Args>,
    F: ApplyArgs<<(T,) as Concat<Args>>::Output, Output = R>,
{
    func.apply_args((this,).concat(args))
}

/// A function with a fixed prefix of leading arguments.
///
/// Created by [`curry`]. Each call appends the call-time arguments to a clone
/// of the prefix and returns the function's result. Repeatable calls clone the
/// function, so closures holding `&mut` captures go through
/// [`Curried::call_once`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Curried<F, P> {
    func: F,
    prefix: P,
}

/// Fixes `prefix` as the leading arguments of `func`.
///
/// An empty prefix `()` yields a function that behaves exactly like `func`;
/// [`Curried::func`] returns the wrapped function itself.
///
/// # Examples
///
/// ```
/// use whenthen::curry::curry;
///
/// let greet = curry(|greeting: &str, name: &str| format!("{greeting}, {name}"), ("hello",));
/// assert_eq!(greet.call(("ada",)), "hello, ada");
///
/// let same = curry(|a: i32, b: i32| a - b, ());
/// assert_eq!(same.call((5, 3)), 2);
/// ```
pub const fn curry<F, P>(func: F, prefix: P) -> Curried<F, P> {
    Curried { func, prefix }
}

impl<F, P> Curried<F, P> {
    /// Returns the wrapped function.
    #[must_use]
    pub const fn func(&self) -> &F {
        &self.func
    }

    /// Returns the fixed prefix arguments.
    #[must_use]
    pub const fn prefix(&self) -> &P {
        &self.prefix
    }

    /// Consumes the wrapper and returns the function and its prefix.
    #[must_use]
    pub fn into_parts(self) -> (F, P) {
        (self.func, self.prefix)
    }

    /// Calls the function with the prefix followed by `rest`.
    pub fn call<Rest, R>(&self, rest: Rest) -> R
    where
        F: Clone + ApplyArgs<<P as Concat<Rest>>::Output, Output = R>,
        P: Clone + Concat<Rest>,
    {
        self.func.clone().apply_args(self.prefix.clone().concat(rest))
    }

    /// Calls the function with `this`, then the prefix, then `rest`.
    ///
    /// `this` is supplied per call, so the receiver is the one at call time
    /// rather than the one in scope when the prefix was fixed.
    ///
    /// # Examples
    ///
    /// ```
    /// use whenthen::curry::curry;
    ///
    /// let record = curry(|log: &mut Vec<String>, level: &str, msg: &str| {
    ///     log.push(format!("[{level}] {msg}"));
    /// }, ("warn",));
    /// let mut first = Vec::new();
    /// let mut second = Vec::new();
    /// record.call_on(&mut first, ("disk low",));
    /// record.call_on(&mut second, ("fan stalled",));
    /// assert_eq!(first, vec!["[warn] disk low"]);
    /// assert_eq!(second, vec!["[warn] fan stalled"]);
    /// ```
    pub fn call_on<T, Rest, R>(&self, this: T, rest: Rest) -> R
    where
        F: Clone + ApplyArgs<<<(T,) as Concat<P>>::Output as Concat<Rest>>::Output, Output = R>,
        P: Clone,
        (T,): Concat<P>,
        <(T,) as Concat<P>>::Output: Concat<Rest>,
    {
        self.func
            .clone()
            .apply_args((this,).concat(self.prefix.clone()).concat(rest))
    }

    /// Consumes the wrapper and calls the function once with the prefix
    /// followed by `rest`.
    pub fn call_once<Rest>(self, rest: Rest) -> <F as ApplyArgs<P::Output>>::Output
    where
        P: Concat<Rest>,
        F: ApplyArgs<P::Output>,
    {
        self.func.apply_args(self.prefix.concat(rest))
    }
}
