use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr;

use super::SparseSet;
use crate::comp::{self, Component};
use crate::entity::Local;
use crate::World;

type Word = usize;

/// The number of words needed to store any `SparseSet<T>`.
///
/// A `SparseSet<T>` only consists of `Vec`s,
/// so its size does not depend on `T`.
const WORDS: usize = (mem::size_of::<SparseSet<u8>>() + mem::size_of::<Word>() - 1)
    / mem::size_of::<Word>();

/// Inline, pointer-aligned storage for exactly one `SparseSet<T>`.
struct Buffer(MaybeUninit<[Word; WORDS]>);

/// Compile-time proof that `SparseSet<T>` fits in a [`Buffer`].
struct Layout<T>(PhantomData<T>);

impl<T> Layout<T> {
    const FITS: () = assert!(
        mem::size_of::<SparseSet<T>>() <= mem::size_of::<Buffer>()
            && mem::align_of::<SparseSet<T>>() <= mem::align_of::<Buffer>(),
        "SparseSet does not fit in the host buffer",
    );
}

impl Buffer {
    fn new<T>(set: SparseSet<T>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Layout::<T>::FITS;

        let mut buffer = Self(MaybeUninit::uninit());
        // Safety: `Layout::<T>::FITS` ensures the size and alignment are sufficient.
        unsafe { buffer.0.as_mut_ptr().cast::<SparseSet<T>>().write(set) };
        buffer
    }

    /// # Safety
    /// The buffer must have been created from a `SparseSet<T>` of the same `T`.
    unsafe fn assume_ref<T>(&self) -> &SparseSet<T> { unsafe { &*self.0.as_ptr().cast() } }

    /// # Safety
    /// The buffer must have been created from a `SparseSet<T>` of the same `T`.
    unsafe fn assume_mut<T>(&mut self) -> &mut SparseSet<T> {
        unsafe { &mut *self.0.as_mut_ptr().cast() }
    }
}

/// Hosts a [`SparseSet`] with its component type erased.
///
/// The sparse set is stored inline without an extra heap allocation.
/// The operations that a [`World`] needs without knowing the component type
/// are captured as function pointers monomorphized at construction.
pub struct Host {
    buffer:             Buffer,
    key:                comp::Key,
    len:                unsafe fn(&Buffer) -> usize,
    destroy_if_present: unsafe fn(&mut Buffer, Local) -> bool,
    relocate:           unsafe fn(&mut Buffer, Local, &mut World, Local) -> bool,
    drop:               unsafe fn(&mut Buffer),
}

static_assertions::assert_impl_all!(Host: Send, Sync);

impl Host {
    /// Wraps a sparse set.
    pub fn new<T: Component>(set: SparseSet<T>) -> Self {
        Self {
            buffer:             Buffer::new(set),
            key:                comp::Key::of::<T>(),
            len:                len::<T>,
            destroy_if_present: destroy_if_present::<T>,
            relocate:           relocate::<T>,
            drop:               drop::<T>,
        }
    }

    /// Returns the key of the hosted component type.
    pub fn key(&self) -> comp::Key { self.key }

    /// Returns the number of components in the hosted set.
    pub fn len(&self) -> usize {
        // Safety: `self.len` was instantiated with the same type as `self.buffer`.
        unsafe { (self.len)(&self.buffer) }
    }

    /// Returns whether the hosted set is empty.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn assert_key<T: Component>(&self) {
        assert_eq!(
            self.key,
            comp::Key::of::<T>(),
            "host of {} cannot be accessed as {}",
            self.key,
            comp::Key::of::<T>()
        );
    }

    /// Returns the hosted set.
    ///
    /// # Panics
    /// Panics if `T` is not the hosted component type.
    pub fn typed<T: Component>(&self) -> &SparseSet<T> {
        self.assert_key::<T>();
        // Safety: the key matches, so the buffer was created from a `SparseSet<T>`.
        unsafe { self.buffer.assume_ref::<T>() }
    }

    /// Returns the hosted set mutably.
    ///
    /// # Panics
    /// Panics if `T` is not the hosted component type.
    pub fn typed_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.assert_key::<T>();
        // Safety: the key matches, so the buffer was created from a `SparseSet<T>`.
        unsafe { self.buffer.assume_mut::<T>() }
    }

    /// Removes the component owned by `owner` if there is one.
    pub(crate) fn destroy_if_present(&mut self, owner: Local) -> bool {
        // Safety: `self.destroy_if_present` was instantiated with the same type as `self.buffer`.
        unsafe { (self.destroy_if_present)(&mut self.buffer, owner) }
    }

    /// Moves the component owned by `src` into the entity `dst` of another world.
    ///
    /// Returns whether `src` had a component.
    pub(crate) fn relocate(&mut self, src: Local, world: &mut World, dst: Local) -> bool {
        // Safety: `self.relocate` was instantiated with the same type as `self.buffer`.
        unsafe { (self.relocate)(&mut self.buffer, src, world, dst) }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        // Safety: `self.drop` was instantiated with the same type as `self.buffer`,
        // and the buffer is never used again.
        unsafe { (self.drop)(&mut self.buffer) }
    }
}

unsafe fn len<T: Component>(buffer: &Buffer) -> usize { unsafe { buffer.assume_ref::<T>() }.len() }

unsafe fn destroy_if_present<T: Component>(buffer: &mut Buffer, owner: Local) -> bool {
    let set = unsafe { buffer.assume_mut::<T>() };
    set.destroy_if_present(owner).is_some()
}

unsafe fn relocate<T: Component>(
    buffer: &mut Buffer,
    src: Local,
    world: &mut World,
    dst: Local,
) -> bool {
    let set = unsafe { buffer.assume_mut::<T>() };
    match set.destroy_if_present(src) {
        Some(value) => {
            world.emplace_component(dst, value);
            true
        }
        None => false,
    }
}

unsafe fn drop<T: Component>(buffer: &mut Buffer) {
    unsafe { ptr::drop_in_place(buffer.assume_mut::<T>()) }
}
