// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::ffi::c_void;
use std::ptr::NonNull;
use std::{fmt, marker, mem, ops};

use crate::sealed::Sealed;

/// Function pointer types that a resolved symbol may be bound to.
///
/// Implemented for `fn`, `unsafe fn`, with the `"C"`, `"system"`, `"C-unwind"`
/// and `"system-unwind"` ABIs, taking up to twelve parameters without borrowed
/// lifetimes (use raw pointers at the FFI boundary). The trait is
/// sealed; it only narrows a binding to *some* function pointer, the exact
/// signature is still the caller's promise.
pub trait FnPtr: Copy + Send + Sync + Sealed + 'static {
	#[doc(hidden)]
	const ASSERT_SIZE: () = assert!(mem::size_of::<Self>() == mem::size_of::<*const c_void>());

	#[doc(hidden)]
	#[inline]
	unsafe fn from_addr(addr: NonNull<c_void>) -> Self {
		#[allow(clippy::let_unit_value)]
		let _ = Self::ASSERT_SIZE;
		mem::transmute_copy(&addr.as_ptr())
	}

	#[doc(hidden)]
	#[inline]
	fn to_addr(self) -> *const c_void {
		#[allow(clippy::let_unit_value)]
		let _ = Self::ASSERT_SIZE;
		// `ASSERT_SIZE` checks sizeof(Self) = sizeof(*const c_void), so `transmute_copy` is safe.
		unsafe { mem::transmute_copy(&self) }
	}
}

macro_rules! impl_fn_ptr {
	($($arg:ident),*) => {
		impl_fn_ptr!(@one "C" [$($arg),*]);
		impl_fn_ptr!(@one "system" [$($arg),*]);
		impl_fn_ptr!(@one "C-unwind" [$($arg),*]);
		impl_fn_ptr!(@one "system-unwind" [$($arg),*]);
	};
	(@one $abi:tt [$($arg:ident),*]) => {
		impl<R: 'static $(, $arg: 'static)*> Sealed for unsafe extern $abi fn($($arg),*) -> R {}
		impl<R: 'static $(, $arg: 'static)*> FnPtr for unsafe extern $abi fn($($arg),*) -> R {}
		impl<R: 'static $(, $arg: 'static)*> Sealed for extern $abi fn($($arg),*) -> R {}
		impl<R: 'static $(, $arg: 'static)*> FnPtr for extern $abi fn($($arg),*) -> R {}
	};
}

impl_fn_ptr!();
impl_fn_ptr!(A1);
impl_fn_ptr!(A1, A2);
impl_fn_ptr!(A1, A2, A3);
impl_fn_ptr!(A1, A2, A3, A4);
impl_fn_ptr!(A1, A2, A3, A4, A5);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_fn_ptr!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// A typed function pointer resolved from a [`Library`](crate::Library).
///
/// The symbol borrows the library it came from, so it cannot be used once the
/// library is closed. Copying the pointer out with `*symbol` drops that
/// guarantee.
#[derive(Clone, Copy)]
pub struct Symbol<'lib, F: FnPtr> {
	pfn: F,
	_marker: marker::PhantomData<&'lib ()>,
}

impl<'lib, F: FnPtr> Symbol<'lib, F> {
	#[inline]
	pub(crate) unsafe fn new(addr: NonNull<c_void>) -> Self {
		Self {
			pfn: F::from_addr(addr),
			_marker: marker::PhantomData,
		}
	}

	/// Returns the raw address of the symbol.
	#[inline]
	pub fn as_ptr(&self) -> *const c_void {
		self.pfn.to_addr()
	}
}

impl<F: FnPtr> ops::Deref for Symbol<'_, F> {
	type Target = F;

	#[inline]
	fn deref(&self) -> &F {
		&self.pfn
	}
}

impl<F: FnPtr> fmt::Debug for Symbol<'_, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Symbol").field(&self.as_ptr()).finish()
	}
}
