//! `Inspect` implementations for standard library types
//!
//! Unsigned 64-bit and pointer-sized unsigned integers have no lossless
//! signed kind and are deliberately not inspectable. `HashMap` and `HashSet`
//! are not inspectable either: their iteration order is not deterministic, so
//! two equal maps could compare, hash and render differently.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex, PoisonError, RwLock};

use super::reflect::Reflect;
use super::value::{Array, Entries, Items, Mapping, Sequence, Value, Visit};
use crate::errors::{RefractError, Result};

/// A value that can lend a `Value` view of itself
///
/// Implemented for primitives, strings, smart pointers, cells, locks and the
/// ordered std collections. Composite types get an implementation from the
/// [`reflect!`](crate::reflect) macro.
pub trait Inspect {
    /// Lend a view of this value to `visit`
    ///
    /// # Errors
    ///
    /// Returns an access error when the value is behind a mutably borrowed
    /// cell or behind a poisoned or re-entered lock, and propagates any error
    /// returned by `visit`.
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()>;

    /// View a slice of this type. Primitive kinds override this to produce a
    /// primitive array; every other type produces an object array.
    #[doc(hidden)]
    fn inspect_slice(items: &[Self], visit: &mut Visit<'_>) -> Result<()>
    where
        Self: Sized,
    {
        visit(Value::Array(Array::Object(&Elements(items))))
    }
}

/// Slice adapter exposing inspectable elements as a `Sequence`
pub struct Elements<'a, T>(pub &'a [T]);

impl<T: Inspect> Sequence for Elements<'_, T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn items(&self) -> Items<'_> {
        Box::new(self.0.iter().map(|item| item as &dyn Inspect))
    }
}

macro_rules! inspect_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Inspect for $ty {
            fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
                visit(Value::$variant(*self))
            }

            fn inspect_slice(items: &[Self], visit: &mut Visit<'_>) -> Result<()> {
                visit(Value::Array(Array::$variant(items)))
            }
        }
    )*};
}

inspect_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
}

macro_rules! inspect_widened {
    ($($ty:ty => $variant:ident($wide:ty)),* $(,)?) => {$(
        impl Inspect for $ty {
            fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
                visit(Value::$variant(<$wide>::from(*self)))
            }
        }
    )*};
}

inspect_widened! {
    u8 => I16(i16),
    u16 => I32(i32),
    u32 => I64(i64),
}

impl Inspect for isize {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        // isize is at most 64 bits on every supported target
        visit(Value::I64(*self as i64))
    }
}

impl Inspect for str {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Str(self))
    }
}

impl Inspect for String {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Str(self))
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Str(self))
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        match self {
            Some(value) => value.inspect(visit),
            None => visit(Value::Null),
        }
    }
}

impl Inspect for dyn Reflect + '_ {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Object(self))
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect(self, visit)
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect(self, visit)
    }
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect(self, visit)
    }
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect(self, visit)
    }
}

/// A dropped referent reads as absent
impl<T: Inspect> Inspect for rc::Weak<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        match self.upgrade() {
            Some(strong) => T::inspect(&strong, visit),
            None => visit(Value::Null),
        }
    }
}

impl<T: Inspect> Inspect for sync::Weak<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        match self.upgrade() {
            Some(strong) => T::inspect(&strong, visit),
            None => visit(Value::Null),
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for RefCell<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        let guard = self
            .try_borrow()
            .map_err(|_| RefractError::unreadable("value is mutably borrowed"))?;
        T::inspect(&guard, visit)
    }
}

thread_local! {
    /// Addresses of the locks this thread acquired while inspecting
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a lock as held by the current thread's traversal until dropped
struct Held(usize);

impl Held {
    fn mark<L: ?Sized>(lock: &L) -> Result<Self> {
        let address = (lock as *const L).cast::<()>() as usize;
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if held.contains(&address) {
                return Err(RefractError::unreadable(
                    "lock is already held by this traversal",
                ));
            }
            held.push(address);
            Ok(Held(address))
        })
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(at) = held.iter().rposition(|a| *a == self.0) {
                held.swap_remove(at);
            }
        });
    }
}

fn poisoned<G>(_: PoisonError<G>) -> RefractError {
    RefractError::unreadable("lock is poisoned")
}

/// Waits for the lock. Reaching a lock this thread's traversal already
/// holds is an access error, not a deadlock.
impl<T: Inspect + ?Sized> Inspect for Mutex<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        let _held = Held::mark(self)?;
        let guard = self.lock().map_err(poisoned)?;
        T::inspect(&guard, visit)
    }
}

impl<T: Inspect + ?Sized> Inspect for RwLock<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        let _held = Held::mark(self)?;
        let guard = self.read().map_err(poisoned)?;
        T::inspect(&guard, visit)
    }
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect_slice(self, visit)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect_slice(self.as_slice(), visit)
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        T::inspect_slice(self, visit)
    }
}

impl<T: Inspect> Sequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn items(&self) -> Items<'_> {
        Box::new(self.iter().map(|item| item as &dyn Inspect))
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Seq(self))
    }
}

impl<T: Inspect> Sequence for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn items(&self) -> Items<'_> {
        Box::new(self.iter().map(|item| item as &dyn Inspect))
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Seq(self))
    }
}

impl<K: Inspect, V: Inspect> Mapping for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(
            self.iter()
                .map(|(key, value)| (key as &dyn Inspect, value as &dyn Inspect)),
        )
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        visit(Value::Map(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of<T: Inspect + ?Sized>(value: &T) -> String {
        let mut out = String::new();
        value
            .inspect(&mut |v| {
                out = v.type_name().to_string();
                Ok(())
            })
            .unwrap();
        out
    }

    #[test]
    fn test_primitive_vectors_become_primitive_arrays() {
        assert_eq!(kind_of(&vec![1i32, 2]), "[i32]");
        assert_eq!(kind_of(&[true, false]), "[bool]");
        assert_eq!(kind_of(&vec![String::from("a")]), "[object]");
        assert_eq!(kind_of(&vec![1u8]), "[object]");
    }

    #[test]
    fn test_unsigned_values_widen() {
        let mut seen = None;
        200u8
            .inspect(&mut |v| {
                if let Value::I16(n) = v {
                    seen = Some(n);
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, Some(200));
    }

    #[test]
    fn test_none_and_dropped_weak_read_as_null() {
        let weak = {
            let strong = Rc::new(5i32);
            Rc::downgrade(&strong)
        };
        assert_eq!(kind_of(&weak), "null");
        assert_eq!(kind_of(&None::<i32>), "null");
    }

    #[test]
    fn test_mutably_borrowed_cell_is_an_access_error() {
        let cell = RefCell::new(1i32);
        let _guard = cell.borrow_mut();
        let err = cell.inspect(&mut |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Access);
    }

    #[test]
    fn test_poisoned_mutex_is_an_access_error() {
        let lock = Mutex::new(1i32);
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = lock.lock().unwrap();
                    panic!("poison the lock");
                })
                .join();
        });
        let err = lock.inspect(&mut |_| Ok(())).unwrap_err();
        assert_eq!(err, RefractError::unreadable("lock is poisoned"));
    }

    #[test]
    fn test_reentered_lock_is_an_access_error_and_released_after() {
        let lock = RwLock::new(1i32);
        let err = lock
            .inspect(&mut |_| lock.inspect(&mut |_| Ok(())))
            .unwrap_err();
        assert_eq!(
            err,
            RefractError::unreadable("lock is already held by this traversal")
        );

        let mut seen = None;
        lock.inspect(&mut |v| {
            seen = Some(matches!(v, Value::I32(1)));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, Some(true));
    }

    #[test]
    fn test_mutex_waits_for_another_thread() {
        let lock = &Mutex::new(7i32);
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::scope(|s| {
            s.spawn(move || {
                let _guard = lock.lock().unwrap();
                tx.send(()).unwrap();
                std::thread::sleep(std::time::Duration::from_millis(50));
            });
            rx.recv().unwrap();
            let mut seen = None;
            lock.inspect(&mut |v| {
                seen = Some(matches!(v, Value::I32(7)));
                Ok(())
            })
            .unwrap();
            assert_eq!(seen, Some(true));
        });
    }

    #[test]
    fn test_btree_collections_yield_items_in_order() {
        let map: BTreeMap<i32, String> = [(2, "b".to_string()), (1, "a".to_string())].into();
        let mut keys = Vec::new();
        for (key, _) in Mapping::entries(&map) {
            key.inspect(&mut |k| {
                if let Value::I32(k) = k {
                    keys.push(k);
                }
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(keys, vec![1, 2]);

        let set: BTreeSet<i8> = [3, 1, 2].into();
        let mut items = Vec::new();
        for item in Sequence::items(&set) {
            item.inspect(&mut |v| {
                if let Value::I8(n) = v {
                    items.push(n);
                }
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(items, vec![1, 2, 3]);
    }
}
