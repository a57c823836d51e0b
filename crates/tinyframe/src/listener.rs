//! Fixed-capacity listener slot tables.
//!
//! Three tables, one per lookup policy: frame-ID (request/response
//! correlation, expiring), frame-type, and generic (catch-all). Capacities
//! are fixed at construction; a slot is either free or active, and a key
//! (ID, type, or generic callback) is active in its table at most once.
//!
//! The tables are generic over the callback value so they only require it
//! to be copyable and comparable; the engine instantiates them with its
//! listener function-pointer type.

use std::any::Any;

use crate::config::Config;
use crate::error::{Error, Result};

pub(crate) struct IdSlot<C> {
    pub id: u32,
    pub cb: C,
    pub user_data: Option<Box<dyn Any>>,
    /// Ticks left until expiry. Not consulted while `period` is 0.
    pub remaining: u16,
    /// Timeout restored by renewal. 0 = never expires.
    pub period: u16,
}

pub(crate) struct TypeSlot<C> {
    pub frame_type: u32,
    pub cb: C,
}

pub(crate) struct GenericSlot<C> {
    pub cb: C,
}

pub(crate) struct Listeners<C> {
    pub id: Vec<Option<IdSlot<C>>>,
    pub by_type: Vec<Option<TypeSlot<C>>>,
    pub generic: Vec<Option<GenericSlot<C>>>,
}

impl<C: Copy + PartialEq> Listeners<C> {
    pub fn new(config: &Config) -> Self {
        Self {
            id: (0..config.max_id_listeners).map(|_| None).collect(),
            by_type: (0..config.max_type_listeners).map(|_| None).collect(),
            generic: (0..config.max_generic_listeners).map(|_| None).collect(),
        }
    }

    pub fn clear(&mut self) {
        self.id.iter_mut().for_each(|slot| *slot = None);
        self.by_type.iter_mut().for_each(|slot| *slot = None);
        self.generic.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn add_id(&mut self, slot: IdSlot<C>) -> Result<()> {
        if self.id.iter().flatten().any(|s| s.id == slot.id) {
            return Err(Error::Duplicate);
        }
        let capacity = self.id.len();
        let free = self
            .id
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::TableFull { capacity })?;
        *free = Some(slot);
        Ok(())
    }

    pub fn remove_id(&mut self, id: u32) -> Result<()> {
        for slot in &mut self.id {
            if slot.as_ref().is_some_and(|s| s.id == id) {
                *slot = None;
                return Ok(());
            }
        }
        Err(Error::NotFound)
    }

    pub fn renew_id(&mut self, id: u32) -> Result<()> {
        for slot in self.id.iter_mut().flatten() {
            if slot.id == id {
                slot.remaining = slot.period;
                return Ok(());
            }
        }
        Err(Error::NotFound)
    }

    /// Take the slot waiting on `id` out of the table, freeing it.
    pub fn take_id_match(&mut self, id: u32) -> Option<IdSlot<C>> {
        self.id
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|s| s.id == id))?
            .take()
    }

    pub fn add_type(&mut self, frame_type: u32, cb: C) -> Result<()> {
        if self.by_type.iter().flatten().any(|s| s.frame_type == frame_type) {
            return Err(Error::Duplicate);
        }
        let capacity = self.by_type.len();
        let free = self
            .by_type
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::TableFull { capacity })?;
        *free = Some(TypeSlot { frame_type, cb });
        Ok(())
    }

    pub fn remove_type(&mut self, frame_type: u32) -> Result<()> {
        for slot in &mut self.by_type {
            if slot.as_ref().is_some_and(|s| s.frame_type == frame_type) {
                *slot = None;
                return Ok(());
            }
        }
        Err(Error::NotFound)
    }

    pub fn add_generic(&mut self, cb: C) -> Result<()> {
        if self.generic.iter().flatten().any(|s| s.cb == cb) {
            return Err(Error::Duplicate);
        }
        let capacity = self.generic.len();
        let free = self
            .generic
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::TableFull { capacity })?;
        *free = Some(GenericSlot { cb });
        Ok(())
    }

    pub fn remove_generic(&mut self, cb: C) -> Result<()> {
        for slot in &mut self.generic {
            if slot.as_ref().is_some_and(|s| s.cb == cb) {
                *slot = None;
                return Ok(());
            }
        }
        Err(Error::NotFound)
    }
}
