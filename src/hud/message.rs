//! Layered, timed HUD messages.
//!
//! Messages live in an arena addressed by generation-checked handles. Each
//! layer keeps an index of handles sorted by descending priority id, which
//! is also the draw order: lower ids are drawn later and so end up in front.
//!
//! Ids `0` and `0xFFFFFFFF` mean "no id". Such messages never replace each
//! other and cannot be usefully detached by id.

use std::any::Any;
use std::fmt;

use log::debug;

use crate::hud::aspect::ScreenSize;
use crate::hud::render::RenderSink;

/// Id meaning "no id".
pub const MESSAGE_ID_NONE: u32 = 0;
/// Id meaning "unremovable by id".
pub const MESSAGE_ID_UNREMOVABLE: u32 = 0xFFFF_FFFF;

/// Number of message layers.
pub const NUM_LAYERS: usize = 3;

/// Build a message id from four ASCII characters, e.g. `make_id(b"PNAM")`.
pub const fn make_id(tag: &[u8; 4]) -> u32 {
    (tag[0] as u32) | ((tag[1] as u32) << 8) | ((tag[2] as u32) << 16) | ((tag[3] as u32) << 24)
}

fn is_real_id(id: u32) -> bool {
    id != MESSAGE_ID_NONE && id != MESSAGE_ID_UNREMOVABLE
}

// ==============================================================================
// Layers and Visibility
// ==============================================================================

/// Z-ordered message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(usize)]
pub enum MessageLayer {
    #[default]
    OverHud = 0,
    UnderHud = 1,
    OverMap = 2,
}

impl MessageLayer {
    pub const ALL: [MessageLayer; NUM_LAYERS] = [
        MessageLayer::OverHud,
        MessageLayer::UnderHud,
        MessageLayer::OverMap,
    ];

    /// Map a raw layer index; anything unknown becomes the default layer.
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => MessageLayer::OverHud,
            1 => MessageLayer::UnderHud,
            2 => MessageLayer::OverMap,
            _ => MessageLayer::default(),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Display situations a message can opt out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Visibility(u32);

impl Visibility {
    pub const NOT_WITH_3D_VIEW: u32 = 1;
    pub const NOT_WITH_FULL_MAP: u32 = 2;
    pub const NOT_WITH_OVERLAY_MAP: u32 = 4;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn intersects(self, other: Visibility) -> bool {
        (self.0 & other.0) != 0
    }

    /// Mask describing the current view.
    pub fn for_view(view_active: bool, automap_active: bool) -> Self {
        let mut bits = 0;
        if view_active {
            bits |= Self::NOT_WITH_3D_VIEW;
        }
        if automap_active {
            bits |= if view_active {
                Self::NOT_WITH_OVERLAY_MAP
            } else {
                Self::NOT_WITH_FULL_MAP
            };
        }
        Self(bits)
    }
}

// ==============================================================================
// Message Trait
// ==============================================================================

/// Per-frame information handed to a message's draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageFrame {
    /// Lowest real-pixel row messages may use.
    pub bottom: i32,
    pub visibility: Visibility,
    pub screen: ScreenSize,
    pub tic_frac: f64,
}

/// A timed message shown on the HUD.
pub trait HudMessage: Any {
    /// Advance one game tick. Returns `true` once the message has expired.
    fn tick(&mut self) -> bool;

    fn draw(&self, frame: &MessageFrame, sink: &mut dyn RenderSink);

    /// Situations in which the message is not drawn.
    fn hidden_in(&self) -> Visibility {
        Visibility::default()
    }

    fn screen_size_changed(&mut self, _screen: ScreenSize) {}

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn HudMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HudMessage")
    }
}

// ==============================================================================
// Message Queue
// ==============================================================================

/// Stable reference to a queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    index: u32,
    generation: u32,
}

struct Entry {
    id: u32,
    layer: MessageLayer,
    message: Box<dyn HudMessage>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Messages serialized per layer, in stored order.
pub type LayerSnapshot<'a> = [Vec<(u32, &'a dyn HudMessage)>; NUM_LAYERS];

/// Owned messages per layer, in stored order, for rebuilding a queue.
pub type LayerRecords = [Vec<(u32, Box<dyn HudMessage>)>; NUM_LAYERS];

/// Per-layer priority lists of timed messages.
#[derive(Default)]
pub struct MessageQueue {
    slots: Vec<Slot>,
    free: Vec<u32>,
    layers: [Vec<MessageHandle>; NUM_LAYERS],
}

impl fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("over_hud", &self.ids(MessageLayer::OverHud))
            .field("under_hud", &self.ids(MessageLayer::UnderHud))
            .field("over_map", &self.ids(MessageLayer::OverMap))
            .finish()
    }
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, handle: MessageHandle) -> Option<&Entry> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn id_of(&self, handle: MessageHandle) -> u32 {
        self.entry(handle).map(|e| e.id).unwrap_or(MESSAGE_ID_NONE)
    }

    fn allocate(&mut self, entry: Entry) -> MessageHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            MessageHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            MessageHandle {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, handle: MessageHandle) -> Option<Entry> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(entry)
    }

    /// Queue a message.
    ///
    /// A real id replaces (and destroys) any message already using it, in
    /// any layer. Unknown layer indices fall back to the default layer.
    pub fn attach(&mut self, message: Box<dyn HudMessage>, id: u32, layer: i32) -> MessageHandle {
        if is_real_id(id) && self.detach_id(id).is_some() {
            debug!("replaced HUD message {:#010x}", id);
        }

        let layer = MessageLayer::from_index(layer);
        let handle = self.allocate(Entry {
            id,
            layer,
            message,
        });
        let list = &self.layers[layer.index()];
        let pos = list
            .iter()
            .position(|&h| self.id_of(h) <= id)
            .unwrap_or(list.len());
        self.layers[layer.index()].insert(pos, handle);
        handle
    }

    /// Unlink the first message with `id` and hand it back.
    pub fn detach_id(&mut self, id: u32) -> Option<Box<dyn HudMessage>> {
        let handle = self
            .layers
            .iter()
            .flat_map(|list| list.iter().copied())
            .find(|&h| self.id_of(h) == id)?;
        self.detach(handle)
    }

    /// Unlink the message behind `handle` and hand it back.
    pub fn detach(&mut self, handle: MessageHandle) -> Option<Box<dyn HudMessage>> {
        let layer = self.entry(handle)?.layer;
        self.layers[layer.index()].retain(|&h| h != handle);
        self.release(handle).map(|entry| entry.message)
    }

    /// Destroy every queued message.
    pub fn detach_all(&mut self) {
        for layer in MessageLayer::ALL {
            let handles = std::mem::take(&mut self.layers[layer.index()]);
            for handle in handles {
                self.release(handle);
            }
        }
    }

    /// Run one game tick; expired messages are destroyed.
    pub fn tick(&mut self) {
        for layer in MessageLayer::ALL {
            let handles = std::mem::take(&mut self.layers[layer.index()]);
            let mut survivors = Vec::with_capacity(handles.len());
            for handle in handles {
                let expired = match self.slots.get_mut(handle.index as usize) {
                    Some(Slot {
                        entry: Some(entry), ..
                    }) => entry.message.tick(),
                    _ => continue,
                };
                if expired {
                    self.release(handle);
                } else {
                    survivors.push(handle);
                }
            }
            self.layers[layer.index()] = survivors;
        }
    }

    /// Draw one layer, back to front.
    pub fn draw(&self, layer: MessageLayer, frame: &MessageFrame, sink: &mut dyn RenderSink) {
        for &handle in &self.layers[layer.index()] {
            if let Some(entry) = self.entry(handle) {
                if entry.message.hidden_in().intersects(frame.visibility) {
                    continue;
                }
                entry.message.draw(frame, sink);
            }
        }
    }

    pub fn screen_size_changed(&mut self, screen: ScreenSize) {
        for slot in &mut self.slots {
            if let Some(entry) = slot.entry.as_mut() {
                entry.message.screen_size_changed(screen);
            }
        }
    }

    pub fn get(&self, handle: MessageHandle) -> Option<&dyn HudMessage> {
        self.entry(handle).map(|e| e.message.as_ref())
    }

    pub fn contains(&self, handle: MessageHandle) -> bool {
        self.entry(handle).is_some()
    }

    /// Handle of the first message carrying `id`.
    pub fn find(&self, id: u32) -> Option<MessageHandle> {
        self.layers
            .iter()
            .flat_map(|list| list.iter().copied())
            .find(|&h| self.id_of(h) == id)
    }

    pub fn layer_of(&self, handle: MessageHandle) -> Option<MessageLayer> {
        self.entry(handle).map(|e| e.layer)
    }

    /// Ids of a layer in stored (draw) order.
    pub fn ids(&self, layer: MessageLayer) -> Vec<u32> {
        self.layers[layer.index()]
            .iter()
            .map(|&h| self.id_of(h))
            .collect()
    }

    /// Ids of a layer from the visually front-most message backwards.
    pub fn front_to_back(&self, layer: MessageLayer) -> Vec<u32> {
        let mut ids = self.ids(layer);
        ids.reverse();
        ids
    }

    pub fn layer_len(&self, layer: MessageLayer) -> usize {
        self.layers[layer.index()].len()
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Enumerate every layer in stored order for serialization.
    pub fn snapshot(&self) -> LayerSnapshot<'_> {
        let mut out: LayerSnapshot<'_> = Default::default();
        for layer in MessageLayer::ALL {
            out[layer.index()] = self.layers[layer.index()]
                .iter()
                .filter_map(|&h| self.entry(h))
                .map(|e| (e.id, e.message.as_ref()))
                .collect();
        }
        out
    }

    /// Replace the queue contents with deserialized layers.
    ///
    /// The given order is kept as is.
    pub fn restore(&mut self, records: LayerRecords) {
        self.detach_all();
        for (index, list) in records.into_iter().enumerate() {
            let layer = MessageLayer::ALL[index];
            for (id, message) in list {
                let handle = self.allocate(Entry { id, layer, message });
                self.layers[index].push(handle);
            }
        }
    }
}
