//! Fixed-size storage that holds one value of any type behind a trait
//! object, without a heap.
//!
//! Screen bodies and dialogs differ in type and size but only one of each
//! is alive at a time. [`InPlace`] reserves `N` bytes inline, constructs the
//! new value in them after dropping the previous one, and hands out
//! `&mut dyn Trait` views. A type that does not fit is a compile error at
//! the `emplace` call site.

use core::{
    marker::PhantomData,
    mem::{align_of, size_of, MaybeUninit},
};

use crate::config::ARENA_ALIGN;

/// Conversion from a concrete pointer to a trait-object pointer.
///
/// Implemented by blanket impls next to each trait that is stored in an
/// [`InPlace`]; the body is always the unsizing coercion `this`.
pub trait Erase<B: ?Sized> {
    /// Unsize `this`.
    fn erase(this: *mut Self) -> *mut B;
}

#[repr(C, align(8))]
struct Bytes<const N: usize>([MaybeUninit<u8>; N]);

struct Occupant<B: ?Sized> {
    view: fn(*mut u8) -> *mut B,
    drop: unsafe fn(*mut u8),
    name: &'static str,
}

struct Fits<T, const N: usize>(PhantomData<T>);

impl<T, const N: usize> Fits<T, N> {
    const OK: () = assert!(
        size_of::<T>() <= N && align_of::<T>() <= ARENA_ALIGN,
        "type does not fit its in-place arena"
    );
}

fn view_as<T: Erase<B>, B: ?Sized>(ptr: *mut u8) -> *mut B {
    T::erase(ptr.cast::<T>())
}

unsafe fn drop_as<T>(ptr: *mut u8) {
    // SAFETY: the caller passes the pointer a live `T` was written to.
    unsafe { core::ptr::drop_in_place(ptr.cast::<T>()) }
}

/// Inline slot for one `B` implementor of at most `N` bytes.
pub struct InPlace<B: ?Sized + 'static, const N: usize> {
    bytes: Bytes<N>,
    occupant: Option<Occupant<B>>,
    // The stored type is erased, so auto traits cannot be proven.
    _not_send: PhantomData<*mut ()>,
}

impl<B: ?Sized + 'static, const N: usize> InPlace<B, N> {
    /// Empty slot.
    pub const fn new() -> Self {
        Self {
            bytes: Bytes([MaybeUninit::uninit(); N]),
            occupant: None,
            _not_send: PhantomData,
        }
    }

    /// Drop the current value, if any, and store `value` in its place.
    pub fn emplace<T: Erase<B>>(&mut self, value: T) -> &mut B {
        let () = Fits::<T, N>::OK;
        self.clear();

        let ptr = self.bytes.0.as_mut_ptr().cast::<u8>();
        // SAFETY: `Fits` guarantees the buffer is large and aligned enough
        // for `T`, and `clear` dropped whatever lived there before.
        unsafe { ptr.cast::<T>().write(value) };
        self.occupant = Some(Occupant {
            view: view_as::<T, B>,
            drop: drop_as::<T>,
            name: core::any::type_name::<T>(),
        });
        // SAFETY: a `T` was written to `ptr` just above.
        unsafe { &mut *view_as::<T, B>(ptr) }
    }

    /// Drop the stored value.
    pub fn clear(&mut self) {
        if let Some(occupant) = self.occupant.take() {
            // SAFETY: `occupant` was created together with the value in
            // `bytes` and is taken exactly once.
            unsafe { (occupant.drop)(self.bytes.0.as_mut_ptr().cast::<u8>()) };
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Type name of the stored value.
    pub fn occupant_name(&self) -> Option<&'static str> {
        self.occupant.as_ref().map(|o| o.name)
    }

    pub fn get(&self) -> Option<&B> {
        let occupant = self.occupant.as_ref()?;
        let ptr = (occupant.view)(self.bytes.0.as_ptr().cast::<u8>().cast_mut());
        // SAFETY: the slot is occupied, so `ptr` points to a live value;
        // the shared borrow of `self` keeps it alive and unaliased by `&mut`.
        Some(unsafe { &*ptr })
    }

    pub fn get_mut(&mut self) -> Option<&mut B> {
        let occupant = self.occupant.as_ref()?;
        let ptr = (occupant.view)(self.bytes.0.as_mut_ptr().cast::<u8>());
        // SAFETY: as in `get`, with the exclusive borrow of `self`.
        Some(unsafe { &mut *ptr })
    }
}

impl<B: ?Sized + 'static, const N: usize> Default for InPlace<B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized + 'static, const N: usize> Drop for InPlace<B, N> {
    fn drop(&mut self) {
        self.clear();
    }
}
