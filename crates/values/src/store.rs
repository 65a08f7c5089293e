use std::collections::BTreeMap;

use catalog::CountryCode;
use foundation::Rgba8;
use rand::Rng;
use runtime::{ListenerId, Listeners};
use tracing::{debug, warn};

use crate::color_scale::{ColorScale, MAX_VALUE};
use crate::sample::SAMPLE_VALUES;

/// One accepted value change.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub code: CountryCode,
    pub value: u8,
}

/// Store listener. Receives read access to the store and every change
/// accepted since the previous notification.
pub type ValueListener = dyn FnMut(&ValueStore, &[ValueChange]);

/// Per-country intensity values in `[0, 100]`.
///
/// Notifications are synchronous and delivered in registration order.
/// Writing the value already stored is a no-op and notifies nobody.
pub struct ValueStore {
    values: BTreeMap<CountryCode, u8>,
    scale: ColorScale,
    listeners: Listeners<ValueListener>,
    pending: Option<Vec<ValueChange>>,
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::new(ColorScale::default())
    }
}

impl std::fmt::Debug for ValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueStore")
            .field("values", &self.values)
            .field("scale", &self.scale)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl ValueStore {
    pub fn new(scale: ColorScale) -> Self {
        Self {
            values: BTreeMap::new(),
            scale,
            listeners: Listeners::new(),
            pending: None,
        }
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Returns `true` when the value changed (and listeners were notified,
    /// or the change was queued in the current batch).
    pub fn set_value(&mut self, code: CountryCode, value: u8) -> bool {
        let value = if value > MAX_VALUE {
            warn!(%code, value, "value out of range, clamping to {MAX_VALUE}");
            MAX_VALUE
        } else {
            value
        };

        if self.values.get(&code) == Some(&value) {
            return false;
        }
        self.values.insert(code, value);

        let change = ValueChange { code, value };
        match self.pending.as_mut() {
            Some(pending) => pending.push(change),
            None => self.notify(&[change]),
        }
        true
    }

    pub fn value(&self, code: CountryCode) -> u8 {
        self.values.get(&code).copied().unwrap_or(0)
    }

    /// `None` exactly when the value is 0.
    pub fn color(&self, code: CountryCode) -> Option<Rgba8> {
        self.scale.color_for(self.value(code))
    }

    /// Owned snapshot sorted by code.
    pub fn all_entries(&self) -> Vec<(CountryCode, u8)> {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ValueStore, &[ValueChange]) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run `f` with notifications coalesced: listeners are called once at
    /// the end with every accepted change, or not at all if nothing changed.
    /// Nested batches fold into the outermost one.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.pending.is_some() {
            return f(self);
        }

        self.pending = Some(Vec::new());
        let out = f(self);
        let changes = self.pending.take().unwrap_or_default();
        if !changes.is_empty() {
            self.notify(&changes);
        }
        out
    }

    /// Assign uniform random values in `[0, 100]` to `codes`, one notification.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        codes: impl IntoIterator<Item = CountryCode>,
        rng: &mut R,
    ) {
        self.batch(|store| {
            for code in codes {
                let value = rng.gen_range(0..=MAX_VALUE);
                store.set_value(code, value);
            }
        });
    }

    /// Reset every existing entry to 0, one notification.
    pub fn clear(&mut self) {
        let codes: Vec<CountryCode> = self.values.keys().copied().collect();
        self.batch(|store| {
            for code in codes {
                store.set_value(code, 0);
            }
        });
    }

    /// Seed the demonstration dataset without notifying listeners.
    pub fn load_sample(&mut self) {
        for (code, value) in SAMPLE_VALUES {
            self.values.insert(code, value);
        }
        debug!(entries = self.values.len(), "sample values loaded");
    }

    fn notify(&mut self, changes: &[ValueChange]) {
        // Detach the registry so listeners can borrow the store immutably.
        let mut listeners = std::mem::take(&mut self.listeners);
        let this: &ValueStore = self;
        listeners.for_each(|listener| listener(this, changes));
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}
