// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod repair;


pub use repair::MAX_REPAIR_SHIFTS;

use crate::{
    compression::Compressor,
    config::{clamp_threshold, ValidatedConfig, MAX_CAPACITY},
    hash::{hash_code, secondary_step},
    probe::ProbeSequence,
    slot::Slot,
    CollisionStrategy, Config, ConfigNotice, EmptyMarkerScheme, Entry, Error, GrowthPolicy,
};
use rand::{rngs::StdRng, SeedableRng};

/// Outcome of probing for a key
enum Lookup {
    /// The key lives in this slot
    Found(usize),

    /// The key is absent, this is the first usable slot
    Vacant(usize),

    /// The key is absent and the probe sequence has no usable slot
    Full,
}

/// An open-addressing hash table from string keys to string values
///
/// Keys are hashed with a polynomial hash (see [`crate::hash`]), compressed
/// into a slot index (see [`crate::compression`]), and collisions are
/// resolved by probing (see [`ProbeSequence`]).
///
/// # Examples
///
/// ```
/// use probe_table::{CollisionStrategy, Config, EmptyMarkerScheme};
///
/// let mut table = Config::new()
///     .collision_strategy(CollisionStrategy::Quadratic)
///     .empty_marker_scheme(EmptyMarkerScheme::ReplaceWithTombstone)
///     .seed(42)
///     .build();
///
/// table.insert("hello", "world")?;
/// assert_eq!(Some("world"), table.get("hello"));
///
/// table.delete("hello")?;
/// assert!(table.search("hello").is_none());
/// #
/// # Ok::<(), probe_table::Error>(())
/// ```
pub struct HashTable {
    slots: Vec<Slot>,

    /// Number of occupied slots
    len: usize,

    /// Number of slots holding a deletion marker
    deleted: usize,

    compressor: Compressor,

    /// Draws compression coefficients
    rng: StdRng,

    rehash_threshold: f64,
    growth_policy: GrowthPolicy,
    collision_strategy: CollisionStrategy,
    marker_scheme: EmptyMarkerScheme,
    max_capacity: Option<usize>,
    max_repair_shifts: usize,

    /// Number of records probing through each slot before reaching their own
    ///
    /// Only tracked under [`EmptyMarkerScheme::ReplaceWithTombstone`], empty otherwise.
    passes: Vec<usize>,

    resize_count: u64,
}

impl std::fmt::Debug for HashTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("deleted", &self.deleted)
            .field("coefficients", &self.compressor.coefficients())
            .field("collision_strategy", &self.collision_strategy)
            .field("marker_scheme", &self.marker_scheme)
            .field("rehash_threshold", &self.rehash_threshold)
            .field("growth_policy", &self.growth_policy)
            .finish_non_exhaustive()
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Config::default().build()
    }
}

impl HashTable {
    pub(crate) fn new(config: ValidatedConfig) -> Self {
        let mut rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let capacity = config.initial_capacity;
        let compressor = Compressor::draw(capacity, &mut rng);

        log::trace!(
            "Creating table with {capacity} slots, coefficients {:?}",
            compressor.coefficients()
        );

        let passes = if config.marker_scheme == EmptyMarkerScheme::ReplaceWithTombstone {
            vec![0; capacity]
        } else {
            vec![]
        };

        Self {
            slots: vec![Slot::Empty; capacity],
            len: 0,
            deleted: 0,
            compressor,
            rng,
            rehash_threshold: config.rehash_threshold,
            growth_policy: config.growth_policy,
            collision_strategy: config.collision_strategy,
            marker_scheme: config.marker_scheme,
            max_capacity: config.max_capacity,
            max_repair_shifts: config.max_repair_shifts,
            passes,
            resize_count: 0,
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`.
    ///
    /// Deletion markers do not count towards the load.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Returns the number of slots holding a deletion marker.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deleted
    }

    /// Returns how often the table has been resized.
    #[must_use]
    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    /// Returns the current compression coefficients `(a, b)`.
    #[must_use]
    pub fn coefficients(&self) -> (u64, u64) {
        self.compressor.coefficients()
    }

    /// Returns the collision strategy.
    #[must_use]
    pub fn collision_strategy(&self) -> CollisionStrategy {
        self.collision_strategy
    }

    /// Returns the empty marker scheme.
    #[must_use]
    pub fn empty_marker_scheme(&self) -> EmptyMarkerScheme {
        self.marker_scheme
    }

    /// Returns the rehash threshold.
    #[must_use]
    pub fn rehash_threshold(&self) -> f64 {
        self.rehash_threshold
    }

    /// Returns the growth policy.
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth_policy
    }

    /// Returns the capacity ceiling, if any.
    #[must_use]
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Returns how many records a single delete may move backward.
    #[must_use]
    pub fn max_repair_shifts(&self) -> usize {
        self.max_repair_shifts
    }

    /// Returns the capacity the table may not grow beyond.
    fn capacity_limit(&self) -> usize {
        self.max_capacity
            .map_or(MAX_CAPACITY, |max| max.min(MAX_CAPACITY))
    }

    /// Sets the rehash threshold, clamping it into `[0, 1]`.
    ///
    /// Returns a notice if the value had to be clamped.
    pub fn set_rehash_threshold(&mut self, threshold: f64) -> Option<ConfigNotice> {
        let (threshold, notice) = clamp_threshold(threshold);

        if let Some(notice) = &notice {
            log::warn!("{notice}");
        }

        self.rehash_threshold = threshold;
        notice
    }

    /// Sets the growth policy, replacing invalid values with defaults.
    ///
    /// Returns a notice if the value had to be replaced.
    pub fn set_growth_policy(&mut self, policy: GrowthPolicy) -> Option<ConfigNotice> {
        let (policy, notice) = policy.normalize();

        if let Some(notice) = &notice {
            log::warn!("{notice}");
        }

        self.growth_policy = policy;
        notice
    }

    /// Returns the slot at the given index.
    #[must_use]
    pub fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx)
    }

    /// Iterates over all records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.slots.iter().filter_map(Slot::entry)
    }

    /// Returns the probe sequence the table uses for `key`.
    #[must_use]
    pub fn probe_sequence(&self, key: &str) -> ProbeSequence {
        Self::probe_with(self.collision_strategy, &self.compressor, key)
    }

    fn probe_with(
        strategy: CollisionStrategy,
        compressor: &Compressor,
        key: &str,
    ) -> ProbeSequence {
        let capacity = compressor.capacity();
        let start = compressor.compress(hash_code(key));

        match strategy {
            CollisionStrategy::Quadratic => ProbeSequence::quadratic(start, capacity),
            CollisionStrategy::Double => {
                ProbeSequence::double(start, secondary_step(key, capacity), capacity)
            }
        }
    }

    /// Returns the slot index holding `key`.
    fn find(&self, key: &str) -> Option<usize> {
        for idx in self.probe_sequence(key) {
            match self.slots.get(idx)? {
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some(idx),
                _ => {}
            }
        }

        None
    }

    /// Probes for `key`, remembering the first usable slot.
    ///
    /// Deleted slots are usable, but probing continues past them because the
    /// key may still be stored further along.
    fn locate(&self, key: &str) -> Lookup {
        let mut vacant = None;

        for idx in self.probe_sequence(key) {
            let Some(slot) = self.slots.get(idx) else {
                break;
            };

            match slot {
                Slot::Empty => return Lookup::Vacant(vacant.unwrap_or(idx)),
                Slot::Occupied(entry) if entry.key() == key => return Lookup::Found(idx),
                Slot::Occupied(_) => {}
                Slot::Available(_) | Slot::Tombstone => {
                    vacant.get_or_insert(idx);
                }
            }
        }

        vacant.map_or(Lookup::Full, Lookup::Vacant)
    }

    /// Stores a new record in a vacant slot.
    fn occupy(&mut self, idx: usize, entry: Entry) {
        let Some(slot) = self.slots.get(idx) else {
            return;
        };

        debug_assert!(!slot.is_occupied(), "slot should be vacant");

        if slot.is_deleted() {
            self.deleted -= 1;
        }

        self.add_trail(entry.key(), idx);

        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Slot::Occupied(entry);
            self.len += 1;
        }
    }

    /// Stores a record whose key is known to be absent.
    ///
    /// Hands the record back if there is no usable slot.
    fn place(&mut self, entry: Entry) -> Result<(), Entry> {
        match self.locate(entry.key()) {
            Lookup::Vacant(idx) => {
                self.occupy(idx, entry);
                Ok(())
            }
            Lookup::Found(idx) => {
                if let Some(slot) = self.slots.get_mut(idx) {
                    *slot = Slot::Occupied(entry);
                }
                Ok(())
            }
            Lookup::Full => Err(entry),
        }
    }

    /// Stores a record whose key is known to be absent, growing the table
    /// until a usable slot is found.
    fn place_growing(&mut self, entry: Entry) -> crate::Result<()> {
        let mut entry = entry;

        loop {
            let Err(rejected) = self.place(entry) else {
                return Ok(());
            };

            log::trace!("No usable slot along probe sequence, growing");

            if !self.try_grow() {
                return Err(Error::TableFull);
            }

            entry = rejected;
        }
    }

    /// Returns `true` if one more record would push a quadratic table past
    /// the half of its slots that probing is guaranteed to reach.
    fn quadratic_stall_ahead(&self) -> bool {
        self.collision_strategy == CollisionStrategy::Quadratic
            && 2 * (self.len + 1) > self.capacity()
    }

    /// Resizes, logging instead of failing if growth is refused.
    fn try_grow(&mut self) -> bool {
        match self.resize() {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Not growing table: {e}");
                false
            }
        }
    }

    /// Inserts a key-value pair.
    ///
    /// If the key exists, its record is replaced in place.
    ///
    /// Grows the table once the load factor exceeds the rehash threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if no usable slot was found and the
    /// table cannot grow any further.
    pub fn insert<K: Into<String>, V: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) -> crate::Result<()> {
        let entry = Entry::new(key, value);

        let vacant = match self.locate(entry.key()) {
            Lookup::Found(idx) => {
                if let Some(slot) = self.slots.get_mut(idx) {
                    *slot = Slot::Occupied(entry);
                }
                return Ok(());
            }
            Lookup::Vacant(idx) => Some(idx),
            Lookup::Full => None,
        };

        let grown_first = vacant.is_some() && self.quadratic_stall_ahead() && self.try_grow();

        match vacant {
            Some(idx) if !grown_first => self.occupy(idx, entry),

            // NOTE: Slot indices are stale after growing
            _ => self.place_growing(entry)?,
        }

        if self.load_factor() > self.rehash_threshold {
            log::trace!(
                "Load factor {} exceeds rehash threshold {}",
                self.load_factor(),
                self.rehash_threshold,
            );
            self.try_grow();
        }

        Ok(())
    }

    /// Returns the record of `key`, if it exists.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<&Entry> {
        self.find(key)
            .and_then(|idx| self.slots.get(idx))
            .and_then(Slot::entry)
    }

    /// Returns the value of `key`, if it exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.search(key).map(Entry::value)
    }

    /// Returns `true` if `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key`, returning its record.
    ///
    /// How the vacated slot is marked depends on the [`EmptyMarkerScheme`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key does not exist.
    pub fn delete(&mut self, key: &str) -> crate::Result<Entry> {
        let entry = self
            .find(key)
            .and_then(|idx| {
                let entry = self.slots.get_mut(idx).map(std::mem::take)?.into_entry()?;
                Some((idx, entry))
            });

        let Some((idx, entry)) = entry else {
            return Err(Error::KeyNotFound(key.to_owned()));
        };

        self.len -= 1;

        match self.marker_scheme {
            EmptyMarkerScheme::Available => {
                self.mark_deleted(idx, Slot::Available(entry.clone()));
            }
            EmptyMarkerScheme::NegativeMarker => self.mark_deleted(idx, Slot::Tombstone),
            EmptyMarkerScheme::ReplaceWithTombstone => {
                let probes = self.probe_sequence(entry.key());
                self.release_trail(probes.clone().take_while(move |&probed| probed != idx));
                self.close_gap(idx, probes);
            }
        }

        Ok(entry)
    }

    /// Writes a deletion marker into a slot.
    fn mark_deleted(&mut self, idx: usize, marker: Slot) {
        debug_assert!(marker.is_deleted(), "should be a deletion marker");

        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = marker;
            self.deleted += 1;
        }
    }

    /// Grows the table according to the growth policy.
    ///
    /// Draws new compression coefficients and moves every record into
    /// a fresh backing array. Deletion markers are dropped.
    ///
    /// If the records do not all fit (quadratic probing does not reach every
    /// slot), the table grows further. Records are only moved once a layout
    /// is found, so a refused resize leaves the table untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityLimit`] if the new capacity would exceed
    /// the configured maximum capacity, or [`MAX_CAPACITY`].
    pub fn resize(&mut self) -> crate::Result<()> {
        let limit = self.capacity_limit();
        let mut capacity = self.capacity();

        loop {
            capacity = self
                .growth_policy
                .next_capacity(capacity)
                .filter(|&next| next <= limit)
                .ok_or(Error::CapacityLimit(limit))?;

            let compressor = Compressor::draw(capacity, &mut self.rng);

            if let Some(layout) = self.plan_layout(&compressor) {
                log::debug!(
                    "Resizing table from {} to {capacity} slots ({} records, {} deletion markers)",
                    self.capacity(),
                    self.len,
                    self.deleted,
                );

                self.apply_layout(compressor, layout);
                break;
            }

            // NOTE: Only quadratic probing can stall, as it does not reach every slot
            log::debug!("Could not fit all records into {capacity} slots, growing further");
        }

        log::trace!(
            "Rebuilt table with {} slots, coefficients {:?}",
            self.capacity(),
            self.compressor.coefficients()
        );

        self.resize_count += 1;

        Ok(())
    }

    /// Removes all records, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.passes.fill(0);
        self.len = 0;
        self.deleted = 0;
    }

    /// Assigns every record a slot under `compressor`, without moving any.
    ///
    /// Each cell of the layout holds the current slot of the record that
    /// goes there. Returns `None` if some record finds no slot.
    fn plan_layout(&self, compressor: &Compressor) -> Option<Vec<Option<usize>>> {
        let mut layout = vec![None; compressor.capacity()];

        for (from, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot.entry() else {
                continue;
            };

            let target = Self::probe_with(self.collision_strategy, compressor, entry.key())
                .find(|&idx| layout.get(idx).is_some_and(Option::is_none))?;

            if let Some(cell) = layout.get_mut(target) {
                *cell = Some(from);
            }
        }

        Some(layout)
    }

    /// Moves the records into a fresh backing array as planned by [`HashTable::plan_layout`].
    fn apply_layout(&mut self, compressor: Compressor, layout: Vec<Option<usize>>) {
        let mut old = std::mem::take(&mut self.slots);

        self.slots = layout
            .into_iter()
            .map(|from| {
                from.and_then(|idx| old.get_mut(idx).map(std::mem::take))
                    .and_then(Slot::into_entry)
                    .map_or(Slot::Empty, Slot::Occupied)
            })
            .collect();

        self.compressor = compressor;
        self.deleted = 0;
        self.recount_passes();
    }
}
