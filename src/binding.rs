// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicPtr, Ordering};
use std::{fmt, marker};

use crate::load::Loader;
use crate::{FnPtr, Library, Result};

/// A named function pointer slot that starts out unbound.
///
/// `Binding::new` is `const`, so a binding can live in a `static` and be filled in
/// later with [`bind`](Binding::bind). The [`declare`](crate::declare) attribute
/// generates these from an `extern` block.
///
/// # Examples
///
/// ```no_run
/// use dlshim::{Binding, Library};
///
/// static ADD: Binding<unsafe extern "C" fn(i32, i32) -> i32> = Binding::new("add");
///
/// let lib = Library::open("./libmath_ops.so").unwrap();
/// unsafe {
///     ADD.bind(&lib).unwrap();
///     assert_eq!(ADD.get().unwrap()(2, 3), 5);
/// }
/// ```
pub struct Binding<F: FnPtr> {
	name: &'static str,
	addr: AtomicPtr<c_void>,
	_marker: marker::PhantomData<F>,
}

impl<F: FnPtr> Binding<F> {
	/// Declares an unbound slot for the symbol `name`.
	#[inline]
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			addr: AtomicPtr::new(ptr::null_mut()),
			_marker: marker::PhantomData,
		}
	}

	/// The symbol name this binding resolves.
	#[inline]
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Resolves the symbol in `lib` and stores it, returning the bound pointer.
	///
	/// A failed lookup resets the binding to the unbound state.
	///
	/// # Safety
	///
	/// `F` must match the signature of the exported symbol, and the stored pointer
	/// must not be called after `lib` is closed.
	pub unsafe fn bind<L: Loader>(&self, lib: &Library<L>) -> Result<F> {
		match lib.symbol::<F>(self.name) {
			Ok(sym) => {
				let pfn = *sym;
				self.addr.store(pfn.to_addr().cast_mut(), Ordering::Release);
				Ok(pfn)
			}
			Err(err) => {
				self.addr.store(ptr::null_mut(), Ordering::Release);
				Err(err)
			}
		}
	}

	/// Returns the bound pointer, or `None` if the binding is unbound.
	#[inline]
	pub fn get(&self) -> Option<F> {
		NonNull::new(self.addr.load(Ordering::Acquire)).map(|addr| unsafe { F::from_addr(addr) })
	}

	#[inline]
	pub fn is_bound(&self) -> bool {
		!self.addr.load(Ordering::Acquire).is_null()
	}

	/// Returns the binding to the unbound state, yielding the last bound pointer.
	pub fn unbind(&self) -> Option<F> {
		NonNull::new(self.addr.swap(ptr::null_mut(), Ordering::AcqRel))
			.map(|addr| unsafe { F::from_addr(addr) })
	}
}

impl<F: FnPtr> fmt::Debug for Binding<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("name", &self.name)
			.field("addr", &self.addr.load(Ordering::Relaxed))
			.finish()
	}
}
