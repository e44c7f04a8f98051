// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The timeline engine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use understory_event_tree::{EventTree, FlatNode, Path, RangeResolver, ResolvedRange};
use understory_timescale::{
    DateRange, Granularity, INITIAL_SCALE, Instant, ScaleError, TimeMarker, TimeScale, Weights,
    add_months, baseline_for, markers, scale_to_fit,
};

use crate::collapse::CollapseSet;
use crate::config::TimelineConfig;
use crate::gesture::{
    CreateState, DoubleTap, GestureKind, NoCapture, PanState, PointerCapture, ResizeState,
    ZoomState,
};
use crate::layout::{LayoutIndex, Slot};
use crate::log;
use crate::memo::Memo;
use crate::request::TimelineRequest;
use crate::viewport::{DisplayMode, Viewport};
use crate::visible::{SelectionInput, VisibleSelector, VisibleSet};

/// Generations the layout index is derived from: tree, collapse set.
type LayoutStamp = (u64, u64);

/// Generations the visible set is derived from: tree, collapse set, view,
/// ranges.
type VisibleStamp = (u64, u64, u64, u64);

/// Years on each side of "now" the page spans when the tree has no dates.
const EMPTY_PAGE_YEARS: i32 = 5;

/// Years on each side of "now" the initial view fits, before zooming out.
const INITIAL_VIEW_YEARS: i32 = 1;

/// The initial view shows the fitted span this many times over.
const INITIAL_VIEW_ZOOM_OUT: f64 = 3.0;

/// Headless timeline over an [`EventTree`].
///
/// The engine owns the tree, its collapse state, the time scale, the viewport
/// snapshot, and the gesture state machines. Everything derived from them
/// (row layout, resolved date ranges, the visible set) is computed on read and
/// cached until one of its inputs changes:
///
/// - loading a tree bumps the tree generation and resets collapse state from
///   each group's `expanded` flag;
/// - collapse operations bump the collapse revision;
/// - scale, scroll, viewport, mode, and scroll-target changes bump the view
///   revision;
/// - [`invalidate`](Self::invalidate) and
///   [`invalidate_all`](Self::invalidate_all) bump the range revision.
///
/// Reads take `&mut self` because they fill these caches.
///
/// Horizontal content pixel `0` is the time scale's reference date; vertical
/// content pixel `0` is the top of the scroll container.
pub struct Timeline {
    pub(crate) config: TimelineConfig,

    tree: EventTree,
    nodes: Vec<FlatNode>,
    tree_generation: u64,
    collapse: CollapseSet,
    ranges: RangeResolver,
    range_revision: u64,
    layout: Memo<LayoutStamp, LayoutIndex>,
    visible: Memo<VisibleStamp, VisibleSet>,
    selector: VisibleSelector,

    pub(crate) scale: TimeScale,
    pub(crate) viewport: Viewport,
    viewport_source: Option<Box<dyn FnMut() -> Viewport>>,
    view_revision: u64,
    mode: DisplayMode,
    sidebar_width: f64,
    sidebar_temp_width: Option<f64>,
    now: Instant,
    page_range: DateRange,
    scroll_target: Option<Path>,

    pub(crate) pan: PanState,
    pub(crate) zoom: ZoomState,
    pub(crate) zoom_kind: Option<GestureKind>,
    pub(crate) taps: DoubleTap,
    pub(crate) create: CreateState,
    pub(crate) resize: ResizeState,
    capture: Box<dyn PointerCapture>,
    captured: u8,
    requests: Vec<TimelineRequest>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("nodes", &self.nodes.len())
            .field("tree_generation", &self.tree_generation)
            .field("collapse_revision", &self.collapse.revision())
            .field("view_revision", &self.view_revision)
            .field("scale", &self.scale)
            .field("viewport", &self.viewport)
            .field("mode", &self.mode)
            .field("captured", &self.captured)
            .field("requests", &self.requests.len())
            .finish_non_exhaustive()
    }
}

impl Timeline {
    /// Creates an engine with an empty tree.
    ///
    /// `now` anchors the page range while the tree has no dates and centres
    /// the [initial view](Self::initial_view).
    #[must_use]
    pub fn new(config: TimelineConfig, now: Instant) -> Self {
        let page_range = default_page(now);
        let mut scale = TimeScale::new(baseline_for(&page_range), INITIAL_SCALE);
        scale.set_limits(config.scale_limits);
        let tree = EventTree::default();
        let nodes = tree.flatten();
        Self {
            config,
            tree,
            nodes,
            tree_generation: 0,
            collapse: CollapseSet::new(),
            ranges: RangeResolver::new(config.range_cache_capacity, config.recurrence_limit),
            range_revision: 0,
            layout: Memo::default(),
            visible: Memo::default(),
            selector: VisibleSelector::default(),
            scale,
            viewport: Viewport::default(),
            viewport_source: None,
            view_revision: 0,
            mode: DisplayMode::default(),
            sidebar_width: config.sidebar_width,
            sidebar_temp_width: None,
            now,
            page_range,
            scroll_target: None,
            pan: PanState::default(),
            zoom: ZoomState::default(),
            zoom_kind: None,
            taps: DoubleTap::default(),
            create: CreateState::default(),
            resize: ResizeState::default(),
            capture: Box::new(NoCapture),
            captured: 0,
            requests: Vec::new(),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Installs the hook notified when gestures start and stop.
    ///
    /// Active gestures are released on the previous hook first.
    pub fn set_pointer_capture(&mut self, capture: Box<dyn PointerCapture>) {
        self.cancel_gestures();
        self.capture = capture;
    }

    // --- Tree -----------------------------------------------------------------

    /// Replaces the document.
    ///
    /// Collapse state is rebuilt from each group's `expanded` flag, cached
    /// group ranges are dropped (leaf ranges survive by content), the page
    /// range and scale baseline follow the new root range, and any active
    /// gesture is cancelled.
    pub fn set_tree(&mut self, tree: EventTree) {
        self.cancel_gestures();
        self.tree = tree;
        self.nodes = self.tree.flatten();
        self.tree_generation = self.tree_generation.wrapping_add(1);
        self.collapse.reset_for(&self.nodes);
        self.ranges.sync(self.tree_generation);
        self.scroll_target = self
            .scroll_target
            .take()
            .filter(|path| self.tree.contains(path.as_slice()));
        self.update_page_range();
        log::debug!(
            nodes = self.nodes.len(),
            generation = self.tree_generation,
            collapsed = self.collapse.len(),
            "tree loaded"
        );
    }

    /// The current document.
    #[must_use]
    pub fn tree(&self) -> &EventTree {
        &self.tree
    }

    /// The document in pre-order; entry `0` is the root.
    #[must_use]
    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    /// Number of trees loaded so far.
    #[must_use]
    pub fn tree_generation(&self) -> u64 {
        self.tree_generation
    }

    /// Updates the current time.
    ///
    /// Only affects the page range of trees without dates and the initial view.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
        self.update_page_range();
    }

    /// The current time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Span of the document: the root's range, or five years either side of
    /// now when the document has no dates.
    #[must_use]
    pub fn page_range(&self) -> DateRange {
        self.page_range
    }

    fn update_page_range(&mut self) {
        let page = self
            .ranges
            .root_range(&self.tree)
            .map_or_else(|| default_page(self.now), |r| r.range());
        self.page_range = page;
        self.scale.set_baseline(baseline_for(&page));
        self.bump_view();
    }

    // --- Collapse ---------------------------------------------------------------

    /// Collapse state.
    #[must_use]
    pub fn collapse_state(&self) -> &CollapseSet {
        &self.collapse
    }

    /// Collapses the group at `path`. Returns `true` if the state changed.
    pub fn collapse(&mut self, path: Path) -> bool {
        self.collapse.collapse(path)
    }

    /// Expands the group at `path`. Returns `true` if the state changed.
    pub fn expand(&mut self, path: &Path) -> bool {
        self.collapse.expand(path)
    }

    /// Flips the group at `path` and returns whether it is now collapsed.
    pub fn toggle(&mut self, path: Path) -> bool {
        self.collapse.toggle(path)
    }

    /// Collapses or expands the group at `path`. Returns `true` if the state
    /// changed.
    pub fn set_collapsed(&mut self, path: Path, collapsed: bool) -> bool {
        self.collapse.set_collapsed(path, collapsed)
    }

    /// Shallowest collapsed strict ancestor of `path`, whose row hidden nodes
    /// are drawn on.
    #[must_use]
    pub fn collapsed_ancestor_of(&self, path: &Path) -> Option<Path> {
        self.collapse.collapsed_ancestor_of(path)
    }

    /// Returns `true` if the group at `path` is collapsed.
    #[must_use]
    pub fn is_collapsed(&self, path: &Path) -> bool {
        self.collapse.is_collapsed(path)
    }

    /// Returns `true` if some strict ancestor of `path` is collapsed.
    #[must_use]
    pub fn is_collapsed_child(&self, path: &Path) -> bool {
        self.collapse.is_collapsed_child(path)
    }

    /// Collapses every group except the root.
    pub fn collapse_all(&mut self) {
        self.collapse.collapse_all(&self.nodes);
    }

    /// Expands every group.
    pub fn expand_all(&mut self) {
        self.collapse.expand_all(&self.nodes);
    }

    // --- Layout -----------------------------------------------------------------

    /// Row layout for the current tree and collapse state.
    pub fn layout(&mut self) -> &LayoutIndex {
        let stamp = (self.tree_generation, self.collapse.revision());
        let nodes = &self.nodes;
        let collapse = &self.collapse;
        self.layout.get_or_update(stamp, || build_layout(nodes, collapse))
    }

    /// Rows above `path`; `0` for unknown paths.
    pub fn predecessor_count(&mut self, path: &Path) -> usize {
        self.layout().predecessor_count(path.as_slice())
    }

    /// Visible rows below `path`; `0` for unknown paths and collapsed groups.
    pub fn children_count(&mut self, path: &Path) -> usize {
        self.layout().children_count(path.as_slice())
    }

    /// Vertical placement of `path`, on its collapsed ancestor's row when
    /// hidden. `None` for unknown paths.
    pub fn slot(&mut self, path: &Path) -> Option<Slot> {
        let config = self.config.layout;
        let stamp = (self.tree_generation, self.collapse.revision());
        let nodes = &self.nodes;
        let collapse = &self.collapse;
        self.layout
            .get_or_update(stamp, || build_layout(nodes, collapse))
            .slot(path, collapse, &config)
    }

    /// Number of rows in the document.
    pub fn rows(&mut self) -> usize {
        self.layout().rows()
    }

    /// Height of the scrollable content.
    pub fn content_height(&mut self) -> f64 {
        let config = self.config.layout;
        self.layout().content_height(&config)
    }

    // --- Ranges -----------------------------------------------------------------

    /// Date range of `path`, folding recurrences and descendants. `None` for
    /// unknown paths and groups without events.
    pub fn range_of(&mut self, path: &Path) -> Option<ResolvedRange> {
        self.ranges.range_of(&self.tree, path)
    }

    /// The range cache.
    #[must_use]
    pub fn ranges(&self) -> &RangeResolver {
        &self.ranges
    }

    /// Drops cached ranges for `path`, its ancestors, and its descendants.
    pub fn invalidate(&mut self, path: &Path) {
        self.ranges.invalidate(&self.tree, path);
        self.range_revision = self.range_revision.wrapping_add(1);
        self.update_page_range();
        log::trace!(%path, "ranges invalidated");
    }

    /// Drops every cached range and derived result.
    pub fn invalidate_all(&mut self) {
        self.ranges.invalidate_all();
        self.ranges.sync(self.tree_generation);
        self.layout.clear();
        self.visible.clear();
        self.range_revision = self.range_revision.wrapping_add(1);
        self.update_page_range();
        log::debug!("all caches invalidated");
    }

    // --- Viewport ---------------------------------------------------------------

    /// Viewport snapshot the engine computes with.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the viewport snapshot.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.bump_view();
        }
    }

    /// Installs a callback that reads the host's scroll container.
    ///
    /// The engine never reads it implicitly; call
    /// [`refresh_viewport`](Self::refresh_viewport) once per input event so
    /// that everything computed for that event sees the same geometry.
    pub fn set_viewport_source(&mut self, source: Box<dyn FnMut() -> Viewport>) {
        self.viewport_source = Some(source);
    }

    /// Pulls a fresh snapshot from the viewport source, if any.
    pub fn refresh_viewport(&mut self) {
        if let Some(source) = self.viewport_source.as_mut() {
            let viewport = source();
            self.set_viewport(viewport);
        }
    }

    /// Sets the scroll offsets.
    pub fn scroll_to(&mut self, scroll: Point) {
        if self.viewport.scroll() != scroll {
            self.viewport.set_scroll(scroll);
            self.bump_view();
        }
    }

    /// Keeps the event at `path` in the visible set regardless of position.
    pub fn set_scroll_target(&mut self, path: Option<Path>) {
        if self.scroll_target != path {
            self.scroll_target = path;
            self.bump_view();
        }
    }

    /// Event kept visible regardless of position.
    #[must_use]
    pub fn scroll_target(&self) -> Option<&Path> {
        self.scroll_target.as_ref()
    }

    /// Sets the scale and scroll offsets that frame the year either side of
    /// now at a third of the viewport width, and returns the scroll offsets.
    ///
    /// Without a usable viewport the scale is reset to [`INITIAL_SCALE`] and
    /// `None` is returned.
    pub fn initial_view(&mut self) -> Option<Point> {
        let baseline = self.scale.baseline();
        self.scale.set_reference(baseline.from);
        self.bump_view();
        if self.viewport.is_empty() {
            let scale = self.scale.clamp_scale(INITIAL_SCALE);
            let _ = self.set_scale(scale);
            return None;
        }
        let span = DateRange::new(
            add_months(self.now, -12 * INITIAL_VIEW_YEARS),
            add_months(self.now, 12 * INITIAL_VIEW_YEARS),
        );
        let fitted = scale_to_fit(self.viewport.width, &span)? / INITIAL_VIEW_ZOOM_OUT;
        let scale = self.scale.clamp_scale(fitted);
        self.set_scale(scale).ok()?;
        let center = self.scale.pixel_from_date(span.midpoint());
        let scroll = Point::new(center - self.viewport.width / 2.0, self.viewport.top);
        self.scroll_to(scroll);
        log::debug!(scale, left = scroll.x, "initial view");
        Some(scroll)
    }

    /// Dates covered by the viewport, extended by the left margin.
    #[must_use]
    pub fn viewport_date_interval(&self) -> DateRange {
        let margin = self.config.left_margin;
        let vp = self.viewport;
        self.scale.interval_for(
            vp.left - vp.offset_left - margin,
            vp.width + vp.offset_left + margin,
        )
    }

    // --- Scale ------------------------------------------------------------------

    /// The time scale.
    #[must_use]
    pub fn time_scale(&self) -> &TimeScale {
        &self.scale
    }

    /// Current scale in pixels per 24 hours.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale.scale()
    }

    /// Sets the scale without moving the scroll offsets.
    ///
    /// Rejected scales leave the engine unchanged.
    pub fn set_scale(&mut self, scale: f64) -> Result<f64, ScaleError> {
        let previous = self.scale.scale();
        match self.scale.set_scale(scale) {
            Ok(applied) => {
                if applied != previous {
                    self.bump_view();
                }
                Ok(applied)
            }
            Err(err) => {
                log::debug!(%err, "scale rejected");
                Err(err)
            }
        }
    }

    /// Granularity weights for the current viewport.
    #[must_use]
    pub fn weights(&self) -> Weights {
        let seconds = self.viewport_date_interval().hours() * 3600.0;
        let width = if self.viewport.is_empty() {
            0.0
        } else {
            self.viewport.width + self.viewport.offset_left
        };
        Weights::compute(seconds, width)
    }

    /// Granularity of the axis markers.
    #[must_use]
    pub fn display_granularity(&self) -> Granularity {
        self.weights().display_granularity()
    }

    /// Granularity edits snap to.
    #[must_use]
    pub fn edit_granularity(&self) -> Granularity {
        self.weights().edit_granularity()
    }

    /// Axis markers across the baseline span at the display granularity.
    #[must_use]
    pub fn markers(&self) -> Vec<TimeMarker> {
        markers(
            &self.scale.baseline(),
            self.display_granularity(),
            self.config.marker_cap,
        )
    }

    // --- Mode -------------------------------------------------------------------

    /// Display mode.
    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switches the display mode.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.bump_view();
        }
    }

    /// Sets the gantt sidebar width.
    pub fn set_sidebar_width(&mut self, width: f64) {
        if width.is_finite() && width >= 0.0 && self.sidebar_width != width {
            self.sidebar_width = width;
            self.bump_view();
        }
    }

    /// Overrides the gantt sidebar width while it is being dragged; `None`
    /// clears the override.
    pub fn set_sidebar_temp_width(&mut self, width: Option<f64>) {
        let width = width.filter(|w| w.is_finite() && *w > 0.0);
        if self.sidebar_temp_width != width {
            self.sidebar_temp_width = width;
            self.bump_view();
        }
    }

    /// Distance from the scroll container's left edge to the start of the
    /// time area: the sidebar width in gantt mode, `0` otherwise.
    #[must_use]
    pub fn left_inset(&self) -> f64 {
        match self.mode {
            DisplayMode::Timeline => 0.0,
            DisplayMode::Gantt => self.sidebar_temp_width.unwrap_or(self.sidebar_width),
        }
    }

    /// Date under the client x coordinate `client_x`.
    #[must_use]
    pub fn date_from_client_left(&self, client_x: f64) -> Instant {
        let content_x = client_x - self.viewport.offset_left - self.left_inset() + self.viewport.left;
        self.scale.date_from_pixel(content_x)
    }

    /// Pointer position relative to the time area's left edge.
    pub(crate) fn local_point(&self, client: Point) -> Point {
        Point::new(
            client.x - (self.viewport.offset_left + self.left_inset()),
            client.y,
        )
    }

    /// The display-granularity unit under `client_x`. Empty when the date
    /// falls exactly on a unit boundary.
    pub(crate) fn unit_range_at(&self, client_x: f64) -> DateRange {
        let granularity = self.display_granularity();
        let date = self.date_from_client_left(client_x);
        DateRange::new(granularity.floor(date), granularity.ceil(date))
    }

    // --- Visible set ------------------------------------------------------------

    /// Sections and events within the viewport's prefetch band.
    pub fn visible(&mut self) -> &VisibleSet {
        let layout_stamp = (self.tree_generation, self.collapse.revision());
        let stamp = (
            layout_stamp.0,
            layout_stamp.1,
            self.view_revision,
            self.range_revision,
        );
        let nodes = &self.nodes;
        let collapse = &self.collapse;
        let layout = self
            .layout
            .get_or_update(layout_stamp, || build_layout(nodes, collapse));
        let input = SelectionInput {
            tree: &self.tree,
            nodes,
            layout,
            collapse,
            scale: &self.scale,
            viewport: self.viewport,
            mode: self.mode,
            scroll_target: self.scroll_target.as_ref(),
            config: &self.config.layout,
        };
        let selector = &mut self.selector;
        let ranges = &mut self.ranges;
        self.visible
            .get_or_update(stamp, || selector.select(&input, ranges))
    }

    /// Forgets every display key handed out so far.
    pub fn reset_keys(&mut self) {
        self.selector.clear();
        self.visible.clear();
    }

    // --- Requests ---------------------------------------------------------------

    /// Requests queued for the editor.
    #[must_use]
    pub fn pending_requests(&self) -> &[TimelineRequest] {
        &self.requests
    }

    /// Takes the queued requests.
    pub fn drain_requests(&mut self) -> alloc::vec::Drain<'_, TimelineRequest> {
        self.requests.drain(..)
    }

    pub(crate) fn push_request(&mut self, request: TimelineRequest) {
        log::debug!(?request, "request queued");
        self.requests.push(request);
    }

    // --- Capture bookkeeping ----------------------------------------------------

    /// Returns `true` while `kind` holds the pointer.
    #[must_use]
    pub fn is_captured(&self, kind: GestureKind) -> bool {
        self.captured & kind.bit() != 0
    }

    pub(crate) fn engage(&mut self, kind: GestureKind) {
        if !self.is_captured(kind) {
            self.captured |= kind.bit();
            self.capture.capture(kind);
            log::trace!(?kind, "gesture started");
        }
    }

    pub(crate) fn disengage(&mut self, kind: GestureKind) {
        if self.is_captured(kind) {
            self.captured &= !kind.bit();
            self.capture.release(kind);
            log::trace!(?kind, "gesture ended");
        }
    }

    /// Discards every active gesture without emitting requests.
    pub fn cancel_gestures(&mut self) {
        self.pan.end();
        self.zoom.end();
        self.zoom_kind = None;
        self.taps.reset();
        self.create.cancel();
        self.resize.cancel();
        for kind in GestureKind::ALL {
            self.disengage(kind);
        }
    }

    pub(crate) fn bump_view(&mut self) {
        self.view_revision = self.view_revision.wrapping_add(1);
    }
}

fn default_page(now: Instant) -> DateRange {
    DateRange::new(
        add_months(now, -12 * EMPTY_PAGE_YEARS),
        add_months(now, 12 * EMPTY_PAGE_YEARS),
    )
}

fn build_layout(nodes: &[FlatNode], collapse: &CollapseSet) -> LayoutIndex {
    log::trace!(nodes = nodes.len(), revision = collapse.revision(), "layout rebuilt");
    LayoutIndex::build(nodes, collapse)
}
