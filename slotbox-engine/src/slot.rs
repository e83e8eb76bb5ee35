//! The owner of one slot's content items.
//!
//! A [`Slot`] is a synchronous state machine. The host feeds it drag/drop
//! events (with the target and layout already resolved) and editor commands;
//! the slot mutates its ordered item container and raises [`SlotEvent`]s.
//! The only suspension points are the initial content fetch and the editor's
//! type chooser, both of which are awaited explicitly by the caller.
//!
//! # Ordering
//!
//! The item container is the logical order. `sort_id`/`box_id` are not
//! rewritten on every mutation; [`Slot::contents`] diffs each item's stored
//! metadata against its current position and marks the item dirty when they
//! disagree. Native reorders performed by the host arrive through
//! [`Slot::sync_visual_order`].
//!
//! # Single slots
//!
//! A single slot holds at most one item. A second add is rejected with
//! [`SlotError::SlotOccupied`]; drops onto an occupied single slot are no-ops.
//! Filling the slot removes any live placeholder.
//! The add affordance is visible exactly while the slot is empty.
//!
//! # Load race
//!
//! The initial fetch completes at an arbitrary point relative to user edits.
//! [`Slot::begin_load`] captures an edit generation and [`Slot::finish_load`]
//! discards the result if any interactive edit happened in between.

use crate::bridge::{ChooserAnchor, SlotEnv, SlotEvent, TypeChoiceRequest};
use crate::config::EngineConfig;
use crate::error::{SlotError, SlotResult};
use crate::event::{DragLeaveEvent, DragOverEvent, DropEvent, EventOutcome, EventTarget};
use crate::geometry::SlotLayout;
use crate::placeholder::{Anchor, DragPhase, PlaceholderTracker, resolve_anchor};
use crate::region::SlotRegion;
use crate::render::{PlacerNode, VisualTree, single_placer_label};
use crate::source::{ContentQuery, ContentSource};
use serde_json::Value;
use slotbox_model::{ContentItem, ItemOrigin, SlotMode, SlotParams, TransferItem};
use slotbox_types::{BoxId, ContentDescriptor, ItemId, SlotId};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Options for [`Slot::add_content`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Select and focus the new item in the editor.
    pub focus: bool,
    /// Payload entry the item was created from.
    pub drop: Option<TransferItem>,
    /// The item is materialized by the slot rather than chosen by the user.
    pub auto_added: bool,
}

impl AddOptions {
    pub fn focused() -> Self {
        Self {
            focus: true,
            ..Default::default()
        }
    }
}

/// Occupancy of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Empty,
    Occupied,
}

/// A pending initial load, issued by [`Slot::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    query: ContentQuery,
    generation: u64,
}

impl LoadTicket {
    pub fn query(&self) -> &ContentQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Contents were applied; the slot now holds this many items.
    Applied(usize),
    /// The slot was edited while the fetch was in flight; result discarded.
    Stale,
    /// The fetch failed; the slot was left as it was.
    Failed,
}

/// The placement engine of one slot region.
pub struct Slot {
    id: SlotId,
    params: SlotParams,
    mode: SlotMode,
    config: EngineConfig,
    env: SlotEnv,
    items: Vec<ContentItem>,
    placeholder: Option<PlaceholderTracker>,
    placer: Option<PlacerNode>,
    events: broadcast::Sender<SlotEvent>,
    /// Bumped on every interactive edit; guards the initial load.
    generation: u64,
}

impl Slot {
    /// Creates the engine for a region and renders its initial layout.
    ///
    /// Does not fetch; see [`Slot::initialize`] and [`Slot::load_contents`].
    pub fn new(region: &SlotRegion, config: EngineConfig, env: SlotEnv) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let mut slot = Self {
            id: SlotId::new(),
            params: region.decode_params(),
            mode: region.mode(),
            config,
            env,
            items: Vec::new(),
            placeholder: None,
            placer: None,
            events,
            generation: 0,
        };
        slot.render_layout();
        debug!(
            slot = %slot.id,
            box_id = ?slot.params.id,
            mode = ?slot.mode,
            "slot created"
        );
        slot
    }

    /// Creates the engine and, for standalone slots, loads existing contents.
    ///
    /// A slot without box or node id skips the load; a failed fetch leaves the
    /// slot with its initial layout.
    pub async fn initialize(
        region: &SlotRegion,
        config: EngineConfig,
        env: SlotEnv,
        source: &dyn ContentSource,
    ) -> Self {
        let mut slot = Self::new(region, config, env);
        if slot.config.standalone {
            match slot.load_contents(source).await {
                Ok(outcome) => debug!(slot = %slot.id, ?outcome, "initial load finished"),
                Err(e) => info!(slot = %slot.id, error = %e, "skipping initial load"),
            }
        }
        slot
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn box_id(&self) -> Option<BoxId> {
        self.params.id
    }

    pub fn params(&self) -> &SlotParams {
        &self.params
    }

    pub fn mode(&self) -> SlotMode {
        self.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn occupancy(&self) -> Occupancy {
        if self.items.is_empty() {
            Occupancy::Empty
        } else {
            Occupancy::Occupied
        }
    }

    /// Items in logical order, without reconciling their metadata.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(ContentItem::id).collect()
    }

    pub fn placeholder_anchor(&self) -> Option<Anchor> {
        self.placeholder.as_ref().and_then(PlaceholderTracker::anchor)
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.placeholder
            .as_ref()
            .map(PlaceholderTracker::phase)
            .unwrap_or_default()
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SlotEvent> {
        self.events.subscribe()
    }

    // ── Reading state ────────────────────────────────────────────

    /// Items in order, with `box_id`/`sort_id` reconciled against the
    /// current position. Items whose metadata changed are marked dirty.
    pub fn contents(&mut self) -> &[ContentItem] {
        let box_id = self.params.id;
        for (index, item) in self.items.iter_mut().enumerate() {
            let sort_id = u32::try_from(index + 1).unwrap_or(u32::MAX);
            if item.reconcile(box_id, sort_id) {
                debug!(item = %item.id(), sort_id, "content item moved");
            }
        }
        &self.items
    }

    /// Wire values of all items in order, for the editor's save action.
    pub fn value(&mut self) -> Vec<ContentDescriptor> {
        self.contents().iter().map(ContentItem::value).collect()
    }

    /// True iff any item is dirty after reconciliation.
    pub fn has_changes(&mut self) -> bool {
        self.contents().iter().any(ContentItem::is_dirty)
    }

    /// Current visual projection.
    pub fn render(&self) -> VisualTree {
        let ids = self.item_ids();
        let placeholder_index = self.placeholder_anchor().map(|a| a.insertion_index(&ids));
        VisualTree::build(self.placer.clone(), ids, placeholder_index)
    }

    // ── Replacing contents ───────────────────────────────────────

    /// Replaces all contents with the descriptors in `contents`.
    ///
    /// Anything other than a JSON array renders an empty slot. Entries that
    /// are not objects are skipped.
    pub fn set_value(&mut self, contents: &Value) {
        let Some(entries) = contents.as_array() else {
            warn!(slot = %self.id, "slot value is not a list, rendering empty slot");
            self.set_contents(Vec::new());
            return;
        };
        let descriptors = entries
            .iter()
            .filter_map(|entry| {
                let descriptor = ContentDescriptor::from_value(entry);
                if descriptor.is_none() {
                    warn!(slot = %self.id, %entry, "skipping non-object content entry");
                }
                descriptor
            })
            .collect();
        self.set_contents(descriptors);
    }

    /// Typed form of [`Slot::set_value`].
    pub fn set_contents(&mut self, contents: Vec<ContentDescriptor>) {
        self.render_layout_without_fill();
        for descriptor in contents {
            if self.mode.is_single() && !self.items.is_empty() {
                warn!(slot = %self.id, "single slot received several items, keeping the first");
                break;
            }
            if let Err(e) = self.insert_item(Some(descriptor), ItemOrigin::Loaded, None, false) {
                warn!(slot = %self.id, error = %e, "could not load content item");
            }
        }
        self.auto_fill();
        self.changed();
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Starts an initial load. Fails when the slot has no box id or the
    /// config no node id.
    pub fn begin_load(&self) -> SlotResult<LoadTicket> {
        let box_id = self.params.id.ok_or(SlotError::MissingContext("box id"))?;
        let node_id = self
            .config
            .node_id
            .ok_or(SlotError::MissingContext("node id"))?;
        Ok(LoadTicket {
            query: ContentQuery::new(box_id, node_id),
            generation: self.generation,
        })
    }

    /// Completes a load started with [`Slot::begin_load`].
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: SlotResult<Vec<ContentDescriptor>>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            warn!(slot = %self.id, "discarding stale content load, slot was edited meanwhile");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(contents) => {
                self.set_contents(contents);
                LoadOutcome::Applied(self.items.len())
            }
            Err(e) => {
                warn!(slot = %self.id, error = %e, "content load failed");
                LoadOutcome::Failed
            }
        }
    }

    /// Fetches this slot's contents from `source` and applies them.
    pub async fn load_contents(&mut self, source: &dyn ContentSource) -> SlotResult<LoadOutcome> {
        let ticket = self.begin_load()?;
        let result = source.fetch_contents(ticket.query()).await;
        Ok(self.finish_load(ticket, result))
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Adds a new item built from `descriptor` (`None` means an empty text item).
    ///
    /// With a drop source in `options` and a live placeholder, the item lands
    /// at the placeholder and the placeholder is removed. Otherwise it is appended.
    pub fn add_content(
        &mut self,
        descriptor: Option<ContentDescriptor>,
        options: AddOptions,
    ) -> SlotResult<ItemId> {
        let index = match (&options.drop, self.placeholder_anchor()) {
            (Some(_), Some(anchor)) => Some(anchor.insertion_index(&self.item_ids())),
            _ => None,
        };
        let origin = match options.drop {
            Some(source) => ItemOrigin::Dropped(source),
            None if options.auto_added => ItemOrigin::AutoFilled,
            None => ItemOrigin::Added,
        };
        let id = self.insert_item(descriptor, origin, index, options.focus)?;
        if index.is_some()
            && let Some(tracker) = self.placeholder.as_mut()
        {
            tracker.destroy();
        }
        self.generation += 1;
        Ok(id)
    }

    /// Fills an empty slot through its add affordance.
    ///
    /// A mandatory slot with a single allowed type is filled directly with a
    /// non-removable item holding the default value. Otherwise the editor's
    /// type chooser is consulted; `Ok(None)` means the user dismissed it.
    pub async fn add_single_content(&mut self) -> SlotResult<Option<ItemId>> {
        if self.mode.is_single() && !self.items.is_empty() {
            return Err(SlotError::SlotOccupied);
        }

        if let Some(content_type) = self.params.mandatory_single_type() {
            let descriptor = ContentDescriptor::new(
                content_type,
                self.params.default_value.clone().unwrap_or_default(),
            );
            let id = self.insert_item(Some(descriptor), ItemOrigin::AutoFilled, None, true)?;
            self.generation += 1;
            return Ok(Some(id));
        }

        let request = TypeChoiceRequest {
            slot: self.id,
            anchor: ChooserAnchor::Placer,
            allowed_types: self.params.allowed_types.clone(),
        };
        let bridge = Arc::clone(&self.env.bridge);
        let Some(descriptor) = bridge.choose_content_type(request).await else {
            debug!(slot = %self.id, "type chooser dismissed");
            return Ok(None);
        };
        let id = self.insert_item(Some(descriptor), ItemOrigin::Added, None, true)?;
        self.generation += 1;
        Ok(Some(id))
    }

    /// Replaces an item's payload; the item becomes dirty.
    pub fn update_content(&mut self, id: ItemId, content: Value) -> SlotResult<()> {
        let item = self.item_mut(id)?;
        item.set_content(content);
        self.generation += 1;
        self.changed();
        Ok(())
    }

    /// Removes an item at the user's request.
    pub fn remove_content(&mut self, id: ItemId) -> SlotResult<ContentItem> {
        let item = self.detach(id)?;
        debug!(slot = %self.id, item = %id, "content item removed");
        Ok(item)
    }

    /// Detaches an item so it can be adopted by another slot.
    pub fn take_content(&mut self, id: ItemId) -> SlotResult<ContentItem> {
        self.detach(id)
    }

    /// Inserts an item detached from another slot at `anchor` (end when `None`).
    ///
    /// The item keeps its stored box id until the next reconciliation, which
    /// moves it to this slot and marks it dirty.
    pub fn adopt_content(&mut self, mut item: ContentItem, anchor: Option<Anchor>) -> SlotResult<ItemId> {
        if self.mode.is_single() && !self.items.is_empty() {
            return Err(SlotError::SlotOccupied);
        }
        if !self.params.accepts(item.content_type()) {
            return Err(SlotError::TypeNotAllowed(item.content_type().to_string()));
        }
        let index = anchor.map_or(self.items.len(), |a| a.insertion_index(&self.item_ids()));
        let id = item.id();
        item.blur();
        self.items.insert(index, item);
        self.generation += 1;
        self.emit(SlotEvent::ItemAdded { slot: self.id, item: id });
        self.changed();
        Ok(id)
    }

    /// Moves an item within the slot.
    pub fn move_content(&mut self, id: ItemId, anchor: Anchor) -> SlotResult<()> {
        let from = self.position(id).ok_or(SlotError::ItemNotFound(id))?;
        if anchor.item() == Some(id) {
            return Ok(());
        }
        let item = self.items.remove(from);
        let to = anchor.insertion_index(&self.item_ids());
        self.items.insert(to, item);
        if from != to {
            self.generation += 1;
            self.changed();
        }
        Ok(())
    }

    /// Applies an order the host produced natively (e.g. by a browser-driven
    /// reorder). Unknown ids are ignored; items missing from `order` keep
    /// their relative order after the listed ones.
    pub fn sync_visual_order(&mut self, order: &[ItemId]) {
        let before = self.item_ids();
        let mut remaining = std::mem::take(&mut self.items);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(pos) = remaining.iter().position(|i| i.id() == *id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.append(&mut remaining);
        self.items = reordered;

        if self.item_ids() != before {
            self.generation += 1;
            self.changed();
        }
    }

    /// Shows or hides the preview rendering of every item.
    pub fn set_preview(&mut self, visible: bool) {
        for item in &mut self.items {
            item.set_preview(visible);
        }
    }

    // ── Drag and drop ────────────────────────────────────────────

    /// Re-anchors the placeholder under the pointer.
    pub fn on_drag_over(&mut self, event: &DragOverEvent) -> EventOutcome {
        let Some(target) = self.owned_target(event.target) else {
            return EventOutcome::Ignored;
        };
        if self.mode.is_single() && !self.items.is_empty() {
            return EventOutcome::Handled;
        }

        let hovered = target.item.filter(|id| self.position(*id).is_some());
        let layout = self.own_layout(&event.layout);
        let anchor = resolve_anchor(event.pointer, hovered, &layout);
        self.placeholder
            .get_or_insert_with(PlaceholderTracker::new)
            .anchor_to(anchor);
        EventOutcome::Handled
    }

    /// Arms the deferred placeholder removal.
    pub fn on_drag_leave(&mut self, event: &DragLeaveEvent, now: Instant) -> EventOutcome {
        if self.owned_target(event.target).is_none() {
            return EventOutcome::Ignored;
        }
        let grace = self.config.leave_grace();
        if let Some(tracker) = self.placeholder.as_mut() {
            tracker.schedule_removal(now, grace);
        }
        EventOutcome::Handled
    }

    /// Delivers deferred transitions. Returns whether the placeholder was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .placeholder
            .as_mut()
            .is_some_and(|tracker| tracker.expire(now));
        if expired {
            debug!(slot = %self.id, "placeholder removed after drag leave");
        }
        expired
    }

    /// Inserts whatever the payload resolves to at the placeholder.
    pub fn on_drop(&mut self, event: &DropEvent) -> EventOutcome {
        if self.owned_target(event.target).is_none() {
            return EventOutcome::Ignored;
        }
        let Some(anchor) = self.placeholder_anchor() else {
            debug!(slot = %self.id, "drop without placeholder");
            return EventOutcome::Handled;
        };

        let resolved = event.payload.resolve(self.env.registry.as_ref());
        let mut index = anchor.insertion_index(&self.item_ids());
        let mut added = 0usize;
        for (descriptor, source) in resolved {
            if self.mode.is_single() && !self.items.is_empty() {
                debug!(slot = %self.id, "single slot occupied, ignoring remaining dropped items");
                break;
            }
            match self.insert_item(Some(descriptor), ItemOrigin::Dropped(source), Some(index), true) {
                Ok(_) => {
                    index += 1;
                    added += 1;
                }
                Err(e) => debug!(slot = %self.id, error = %e, "dropped item rejected"),
            }
        }
        if added == 0 {
            debug!(slot = %self.id, "drop resolved to no content");
        } else {
            self.generation += 1;
        }

        if let Some(tracker) = self.placeholder.as_mut() {
            tracker.destroy();
        }
        EventOutcome::Handled
    }

    // ── Internals ────────────────────────────────────────────────

    fn render_layout(&mut self) {
        self.render_layout_without_fill();
        self.auto_fill();
    }

    fn render_layout_without_fill(&mut self) {
        self.items.clear();
        if let Some(tracker) = self.placeholder.as_mut() {
            tracker.destroy();
        }
        self.update_placer();
    }

    /// Materializes the default item of an empty mandatory single-type slot.
    fn auto_fill(&mut self) -> Option<ItemId> {
        if !self.mode.is_single() || !self.items.is_empty() {
            return None;
        }
        let content_type = self.params.mandatory_single_type()?;
        let descriptor = ContentDescriptor::new(
            content_type,
            self.params.default_value.clone().unwrap_or_default(),
        );
        match self.insert_item(Some(descriptor), ItemOrigin::AutoFilled, None, false) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(slot = %self.id, error = %e, "could not auto-fill slot");
                None
            }
        }
    }

    fn insert_item(
        &mut self,
        descriptor: Option<ContentDescriptor>,
        origin: ItemOrigin,
        index: Option<usize>,
        focus: bool,
    ) -> SlotResult<ItemId> {
        if self.mode.is_single() && !self.items.is_empty() {
            return Err(SlotError::SlotOccupied);
        }
        let descriptor = descriptor.unwrap_or_default();
        let content_type = descriptor.type_or_default();
        // Stored contents are authoritative even if the constraint changed since.
        if origin != ItemOrigin::Loaded && !self.params.accepts(content_type) {
            return Err(SlotError::TypeNotAllowed(content_type.to_string()));
        }

        let pinned = origin == ItemOrigin::AutoFilled && !self.params.optional;
        let mut item = ContentItem::from_descriptor(descriptor, &self.config.default_template, origin);
        let index = index.unwrap_or(self.items.len()).min(self.items.len());
        if item.box_id().is_none() {
            item.set_box_id(self.params.id);
        }
        if item.sort_id().is_none() {
            item.set_sort_id(u32::try_from(index + 1).ok());
        }
        if pinned {
            item.set_removable(false);
        }

        let id = item.id();
        self.items.insert(index, item);
        if self.mode.is_single()
            && let Some(tracker) = self.placeholder.as_mut()
        {
            tracker.destroy();
        }
        if focus {
            self.focus_item(id);
        }
        self.emit(SlotEvent::ItemAdded { slot: self.id, item: id });
        self.changed();
        Ok(id)
    }

    fn detach(&mut self, id: ItemId) -> SlotResult<ContentItem> {
        let index = self.position(id).ok_or(SlotError::ItemNotFound(id))?;
        if !self.items[index].is_removable() {
            return Err(SlotError::NotRemovable(id));
        }
        let item = self.items.remove(index);
        self.generation += 1;
        self.emit(SlotEvent::ItemRemoved { slot: self.id, item: id });
        self.changed();
        Ok(item)
    }

    fn focus_item(&mut self, id: ItemId) {
        for item in &mut self.items {
            if item.id() == id {
                item.focus();
            } else {
                item.blur();
            }
        }
        self.env.bridge.select_and_focus(self.id, id);
    }

    fn item_mut(&mut self, id: ItemId) -> SlotResult<&mut ContentItem> {
        self.items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or(SlotError::ItemNotFound(id))
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == id)
    }

    /// The target, if it resolves to this slot.
    fn owned_target(&self, target: Option<EventTarget>) -> Option<EventTarget> {
        match target {
            Some(t) if t.slot == Some(self.id) => Some(t),
            Some(t) => {
                debug!(slot = %self.id, target = ?t.slot, "ignoring event for another slot");
                None
            }
            None => None,
        }
    }

    /// Layout restricted to items of this slot.
    fn own_layout(&self, layout: &SlotLayout) -> SlotLayout {
        SlotLayout {
            bounds: layout.bounds,
            items: layout
                .items
                .iter()
                .filter(|(id, _)| self.position(*id).is_some())
                .copied()
                .collect(),
            zoom: layout.zoom,
        }
    }

    fn update_placer(&mut self) {
        self.placer = match self.mode {
            SlotMode::Multi => Some(PlacerNode::Multi),
            SlotMode::Single if self.items.is_empty() => Some(self.single_placer()),
            SlotMode::Single => None,
        };
    }

    fn single_placer(&self) -> PlacerNode {
        let type_label = self.params.allowed_types.first().map(|key| {
            self.env
                .registry
                .describe(key)
                .map_or_else(|| key.clone(), |t| t.label)
        });
        PlacerNode::Single {
            label: single_placer_label(type_label.as_deref()),
        }
    }

    fn changed(&mut self) {
        self.update_placer();
        self.emit(SlotEvent::Changed(self.id));
    }

    fn emit(&self, event: SlotEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
