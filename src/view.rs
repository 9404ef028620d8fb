//! The interactive floor-plan view.
//!
//! [`FloorPlanView`] is what a hosting UI holds for one open floor plan. It
//! owns the viewport controller, the room and object lists, selection,
//! pointer input state and (optionally) gesture control, and reports every
//! derived change to a [`PlanStore`]. Everything runs on the caller's
//! thread; [`FloorPlanView::frame`] is the per-display-frame entry point.

use crate::constants::{MIN_SELECTION_BOX, OBJECT_HIT_RADIUS};
use crate::error::CameraError;
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{
    AcquisitionTicket, CameraBackend, CameraStream, GestureController, GestureEvent, LandmarkMailbox,
};
use crate::hit_testing::{apply_room_changes, reassign_rooms_with};
use crate::input::{self, InputState};
use crate::notifications::NotificationSink;
use crate::perf::PerfMonitor;
use crate::profile_scope;
use crate::selection::{SelectionState, bounding_box_of};
use crate::settings::Settings;
use crate::spatial_index::RoomIndex;
use crate::types::{FloorPlan, MapObject, ObjectId, PlanId, Room, RoomId};
use crate::viewport::{Viewport, ViewportController};
use std::collections::HashMap;
use std::time::Instant;

/// External persistence for plan data. Failures are logged and never abort
/// the interaction that caused them.
pub trait PlanStore {
    /// Called when the viewport settles after a change.
    fn save_viewport(&mut self, plan_id: PlanId, viewport: Viewport) -> anyhow::Result<()>;

    fn save_object_positions(
        &mut self,
        plan_id: PlanId,
        positions: &[(ObjectId, Point)],
    ) -> anyhow::Result<()>;

    /// Batch of derived room memberships; `None` means "in no room".
    fn save_room_assignments(
        &mut self,
        plan_id: PlanId,
        changes: &HashMap<ObjectId, Option<RoomId>>,
    ) -> anyhow::Result<()>;

    fn save_room(&mut self, plan_id: PlanId, room: &Room) -> anyhow::Result<()>;

    fn delete_room(&mut self, plan_id: PlanId, room_id: RoomId) -> anyhow::Result<()>;
}

/// What the host should do after [`FloorPlanView::frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutput {
    pub redraw: bool,
    /// Viewport handed to the store this frame
    pub committed: Option<Viewport>,
    /// Gesture activity this frame, if a sample or timer was processed
    pub gesture: Option<GestureEvent>,
}

pub struct FloorPlanView {
    pub(crate) plan_id: PlanId,
    pub(crate) viewport: ViewportController,
    pub(crate) rooms: Vec<Room>,
    pub(crate) room_index: RoomIndex,
    pub(crate) objects: Vec<MapObject>,
    pub(crate) selection: SelectionState,
    pub(crate) input: InputState,
    pub(crate) gesture: Option<GestureController>,
    mailbox: LandmarkMailbox,
    store: Box<dyn PlanStore>,
    settings: Settings,
    perf: PerfMonitor,
    content_dirty: bool,
}

impl FloorPlanView {
    /// Open `plan` in a viewport of `viewport_size`.
    ///
    /// The initial viewport is the plan's last viewport, else its default
    /// view, else fit-to-view. Cached room ids are re-derived from geometry.
    pub fn open(
        plan: FloorPlan,
        viewport_size: Size,
        store: Box<dyn PlanStore>,
        settings: Settings,
        now: Instant,
    ) -> Self {
        let mut viewport =
            ViewportController::new(viewport_size, plan.image_size, settings.viewport.clone());
        viewport.set_default_view(plan.default_view);
        viewport.enter_plan(plan.last_viewport, now);

        tracing::info!(
            "Opened floor plan {} '{}' ({} rooms, {} objects)",
            plan.id,
            plan.name,
            plan.rooms.len(),
            plan.objects.len()
        );

        let mut view = Self {
            plan_id: plan.id,
            viewport,
            room_index: RoomIndex::from_rooms(&plan.rooms),
            rooms: plan.rooms,
            objects: plan.objects,
            selection: SelectionState::new(),
            input: InputState::Idle,
            gesture: None,
            mailbox: LandmarkMailbox::new(),
            store,
            settings,
            perf: PerfMonitor::new(),
            content_dirty: true,
        };
        view.reassign_rooms();
        view
    }

    /// Enable the gesture channel for this view. Does not start the camera.
    pub fn attach_gesture_control(
        &mut self,
        backend: Box<dyn CameraBackend>,
        sink: Box<dyn NotificationSink>,
    ) {
        if let Some(mut old) = self.gesture.take() {
            old.teardown();
        }
        self.gesture = Some(GestureController::new(
            self.settings.gesture.clone(),
            backend,
            sink,
        ));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    pub fn gesture(&self) -> Option<&GestureController> {
        self.gesture.as_ref()
    }

    pub fn gesture_mut(&mut self) -> Option<&mut GestureController> {
        self.gesture.as_mut()
    }

    /// Handle for the camera/inference callback to post samples into.
    pub fn landmark_mailbox(&self) -> LandmarkMailbox {
        self.mailbox.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Topmost room containing the world point.
    pub fn room_at(&self, world: Point) -> Option<&Room> {
        self.room_index.room_at(world).and_then(|id| self.room(id))
    }

    pub fn room_at_screen(&self, screen: Point) -> Option<&Room> {
        self.room_at(self.viewport.screen_to_world(screen))
    }

    pub fn object_at_screen(&self, screen: Point) -> Option<ObjectId> {
        input::object_at(&self.objects, &self.viewport.viewport(), screen, OBJECT_HIT_RADIUS)
    }

    /// World bounds of the selected objects.
    pub fn selection_bounds(&self) -> Option<Rect> {
        bounding_box_of(&self.objects, self.selection.selected_ids())
    }

    /// Where to draw an object this frame, including drag previews.
    pub fn display_position(&self, id: ObjectId) -> Option<Point> {
        self.input
            .dragged_position(id)
            .or_else(|| self.object(id).map(MapObject::position))
    }

    /// Where to draw a room this frame, including drag previews.
    pub fn display_room(&self, id: RoomId) -> Option<Room> {
        let mut room = self.room(id)?.clone();
        if let Some((dragged, shape)) = self.input.dragged_room() {
            if dragged == id {
                room.shape = shape;
            }
        }
        Some(room)
    }

    /// Minimum world-space selection box side at the current zoom.
    pub(crate) fn min_selection_box_world(&self) -> f32 {
        MIN_SELECTION_BOX / self.viewport.zoom()
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// Add a room on top of all existing rooms.
    pub fn add_room(&mut self, room: Room) {
        profile_scope!("add_room");
        if self.room(room.id).is_some() {
            tracing::warn!("Room {} already exists, updating instead", room.id);
            self.update_room(room);
            return;
        }
        self.room_index.insert(&room);
        self.persist("room", |store, plan| store.save_room(plan, &room));
        self.rooms.push(room);
        self.content_dirty = true;
        self.reassign_rooms();
    }

    /// Replace a room's name or geometry, keeping its draw order.
    pub fn update_room(&mut self, room: Room) {
        profile_scope!("update_room");
        let Some(slot) = self.rooms.iter_mut().find(|r| r.id == room.id) else {
            tracing::warn!("Update for unknown room {}", room.id);
            return;
        };
        *slot = room.clone();
        self.room_index.update(&room);
        self.persist("room", |store, plan| store.save_room(plan, &room));
        self.content_dirty = true;
        self.reassign_rooms();
    }

    pub fn delete_room(&mut self, room_id: RoomId) -> bool {
        profile_scope!("delete_room");
        let before = self.rooms.len();
        self.rooms.retain(|room| room.id != room_id);
        if self.rooms.len() == before {
            return false;
        }
        self.room_index.remove(room_id);
        self.selection.forget_room(room_id);
        if matches!(self.input, InputState::DraggingRoom { room_id: dragged, .. } if dragged == room_id)
        {
            self.input.reset();
        }
        self.persist("room deletion", |store, plan| store.delete_room(plan, room_id));
        self.content_dirty = true;
        self.reassign_rooms();
        true
    }

    // ========================================================================
    // Objects
    // ========================================================================

    pub fn add_object(&mut self, object: MapObject) {
        self.objects.push(object);
        self.content_dirty = true;
        self.reassign_rooms();
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|object| object.id != id);
        self.selection.retain_objects(|selected| selected != id);
        let removed = self.objects.len() != before;
        if removed {
            self.content_dirty = true;
        }
        removed
    }

    /// The object-move path: apply positions, persist them, then re-derive
    /// room membership.
    pub fn move_objects(&mut self, positions: &[(ObjectId, Point)]) {
        profile_scope!("move_objects");
        if positions.is_empty() {
            return;
        }
        let targets: HashMap<ObjectId, Point> = positions.iter().copied().collect();
        for object in &mut self.objects {
            if let Some(p) = targets.get(&object.id) {
                object.set_position(*p);
            }
        }
        self.persist("object positions", |store, plan| {
            store.save_object_positions(plan, positions)
        });
        self.content_dirty = true;
        self.reassign_rooms();
    }

    /// Re-derive every object's room, apply and persist the changes.
    pub fn reassign_rooms(&mut self) -> HashMap<ObjectId, Option<RoomId>> {
        let started = Instant::now();
        let index = &self.room_index;
        let changes = reassign_rooms_with(&self.objects, |p| index.room_at(p));
        if !changes.is_empty() {
            apply_room_changes(&mut self.objects, &changes);
            self.persist("room assignments", |store, plan| {
                store.save_room_assignments(plan, &changes)
            });
        }
        self.perf
            .record_operation("reassign_rooms", started.elapsed().as_secs_f64() * 1000.0);
        changes
    }

    fn persist(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut dyn PlanStore, PlanId) -> anyhow::Result<()>,
    ) {
        if let Err(e) = op(self.store.as_mut(), self.plan_id) {
            tracing::error!("Failed to save {} for plan {}: {:#}", what, self.plan_id, e);
        }
    }

    // ========================================================================
    // Viewport commands
    // ========================================================================

    /// Animate to an object at readable zoom.
    pub fn focus_object(&mut self, id: ObjectId, now: Instant) -> bool {
        let Some(p) = self.object(id).map(MapObject::position) else {
            return false;
        };
        self.viewport.focus_to(p, None, now);
        true
    }

    /// Animate to the centre of a room at readable zoom.
    pub fn focus_room(&mut self, id: RoomId, now: Instant) -> bool {
        let Some(bounds) = self.room(id).and_then(|room| room.shape.bounds()) else {
            return false;
        };
        self.viewport.focus_to(bounds.center(), None, now);
        true
    }

    /// Record the current viewport as this plan's default view.
    pub fn save_default_view(&mut self) {
        self.viewport.save_default_view();
    }

    pub fn resize(&mut self, viewport_size: Size, now: Instant) {
        self.viewport.resize(viewport_size, now);
    }

    // ========================================================================
    // Gesture control
    // ========================================================================

    /// Returns whether gesture control is now enabled (or enabling).
    pub fn toggle_gesture_control(&mut self) -> bool {
        match self.gesture.as_mut() {
            Some(gesture) => gesture.toggle(),
            None => {
                tracing::warn!("Gesture control toggled with no camera backend attached");
                false
            }
        }
    }

    pub fn request_calibration(&mut self, now: Instant) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.request_calibration(now);
        }
    }

    /// Completion callback for a camera request.
    pub fn camera_ready(
        &mut self,
        ticket: AcquisitionTicket,
        result: Result<Box<dyn CameraStream>, CameraError>,
        now: Instant,
    ) -> bool {
        match self.gesture.as_mut() {
            Some(gesture) => gesture.camera_ready(ticket, result, now),
            None => {
                if let Ok(mut stream) = result {
                    stream.stop();
                }
                false
            }
        }
    }

    // ========================================================================
    // Frame loop & lifecycle
    // ========================================================================

    /// Per-display-frame work: animation, gesture samples and timers,
    /// render coalescing and viewport commits.
    pub fn frame(&mut self, now: Instant) -> FrameOutput {
        profile_scope!("frame");
        self.perf.begin_frame();

        let animating = self.viewport.advance(now);

        let mut gesture_event = None;
        if let Some(gesture) = self.gesture.as_mut() {
            if let Some(sample) = self.mailbox.take() {
                let started = Instant::now();
                gesture_event = Some(gesture.process_sample(sample, &mut self.viewport));
                self.perf
                    .record_operation("gesture_frame", started.elapsed().as_secs_f64() * 1000.0);
            }
            if let Some(event) = gesture.tick(now) {
                gesture_event = Some(event);
            }
        }

        let signals = self.viewport.poll(now);
        if let Some(committed) = signals.committed {
            tracing::debug!(
                "Committing viewport zoom={:.3} pan=({:.1}, {:.1})",
                committed.zoom,
                committed.pan.x,
                committed.pan.y
            );
            self.persist("viewport", |store, plan| store.save_viewport(plan, committed));
        }

        let redraw = signals.redraw || animating || std::mem::take(&mut self.content_dirty);

        if let Some(ms) = self.perf.end_frame() {
            tracing::trace!("frame took {:.2}ms", ms);
        }

        FrameOutput {
            redraw,
            committed: signals.committed,
            gesture: gesture_event,
        }
    }

    /// Swap in new settings (e.g. after the settings file changed).
    pub fn apply_settings(&mut self, settings: Settings) {
        self.viewport.apply_settings(settings.viewport.clone());
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.apply_settings(settings.gesture.clone());
        }
        self.settings = settings;
        self.content_dirty = true;
    }

    /// Leave the view: drop any in-flight interaction, tear down gesture
    /// control and the camera, and flush a settling viewport to the store.
    pub fn leave(&mut self) {
        self.input.reset();
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.teardown();
        }
        self.mailbox.clear();
        if let Some(viewport) = self.viewport.flush_commit() {
            self.persist("viewport", |store, plan| store.save_viewport(plan, viewport));
        }
        self.perf.log_summary_if_slow();
        tracing::info!("Left floor plan {}", self.plan_id);
    }
}

impl Drop for FloorPlanView {
    fn drop(&mut self) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.teardown();
        }
    }
}
