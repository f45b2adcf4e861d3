use crate::boxes::BoxesView;
use crate::utils::*;
use bitflags::bitflags;
use game::BoxStore;
use gloo::timers::callback::Timeout;
use macrodata_core as game;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

const INCORRECT: &str = "Incorrect!";

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// Wheel up zooms in by one step, wheel down zooms out.
fn wheel_steps(delta_y: f64) -> i8 {
    if delta_y < 0.0 {
        1
    } else if delta_y > 0.0 {
        -1
    } else {
        0
    }
}

/// Found cells fly into the chosen box while it takes the deposit, and stay
/// gone until the next grid is dealt.
fn deposit_class(found: bool, phase: game::Phase) -> Option<&'static str> {
    use game::Phase::*;
    match phase {
        Depositing { .. } if found => Some("depositing"),
        Closing { .. } | Filled { .. } if found => Some("deposited"),
        _ => None,
    }
}

/// Pointer position relative to the top left of `container`.
fn local_point(container: &NodeRef, e: &MouseEvent) -> game::Point {
    let (x, y) = (f64::from(e.client_x()), f64::from(e.client_y()));
    match container.cast::<Element>() {
        Some(element) => {
            let rect = element.get_bounding_client_rect();
            game::Point::new(x - rect.left(), y - rect.top())
        }
        None => game::Point::new(x, y),
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Down(game::CellIndex),
    Enter(game::CellIndex),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    PointerUp,
    ViewportDown(game::Point),
    ViewportMove(game::Point),
    ViewportLeave,
    Zoom { steps: i8, cursor: game::Point },
    OpenBox,
    Confirm,
    NewGrid,
    Back,
    Key(String),
    Timer(game::TimerToken),
    ReleaseHover,
    Relayout,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: game::CellIndex,
    coords: game::Coord2,
    digit: game::Digit,
    #[prop_or_default]
    found: bool,
    #[prop_or_default]
    deposit: Option<&'static str>,
    scale: f64,
    size: f64,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        index,
        coords: (row, col),
        digit,
        found,
        deposit,
        scale,
        size,
        callback,
    } = props.clone();

    let style = format!(
        "top: {}px; left: {}px; width: {size}px; height: {size}px; transform: scale({scale});",
        f64::from(row) * size,
        f64::from(col) * size,
    );

    let onpointerdown = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            // anything but a plain left press bubbles up and pans
            if buttons == MouseButtons::LEFT {
                e.stop_propagation();
                callback.emit(CellMsg::Down(index));
            }
            log::trace!("({}, {}) pointer down ({:?})", row, col, buttons);
        })
    };

    let onpointerenter = Callback::from(move |_: PointerEvent| {
        callback.emit(CellMsg::Enter(index));
    });

    html! {
        <div class={classes!("cell", found.then_some("found"), deposit)} {style} {onpointerdown} {onpointerenter}>
            {digit}
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct RefinementProps {
    pub seed: u64,
    /// Current box fills, owned by the host.
    pub progress: game::BoxFills,
    /// Receives the replacement fills after a deposit is committed.
    pub on_progress: Callback<game::BoxFills>,
    pub on_complete: Callback<()>,
    pub on_back: Callback<()>,
}

pub(crate) struct RefinementView {
    engine: game::RoundEngine,
    viewport: game::Viewport,
    proximity: game::ProximityParams,
    message: Option<&'static str>,
    container: NodeRef,
    _phase_timer: Option<Timeout>,
    _hover_timer: Option<Timeout>,
}

impl RefinementView {
    fn layout(&self) -> game::Layout {
        let viewport = self
            .container
            .cast::<Element>()
            .map(|element| {
                game::Size::new(
                    f64::from(element.client_width()),
                    f64::from(element.client_height()),
                )
            })
            .unwrap_or_default();

        game::Layout {
            viewport,
            content: self
                .viewport
                .content_size(self.engine.config().content_size()),
        }
    }

    fn arm(&mut self, ctx: &Context<Self>, scheduled: game::ScheduledTransition) {
        let link = ctx.link().clone();
        let token = scheduled.token;
        let millis = u32::try_from(scheduled.delay.as_millis()).unwrap_or(u32::MAX);
        // replacing the handle drops, and so cancels, whatever was pending
        self._phase_timer = Some(Timeout::new(millis, move || {
            link.send_message(Msg::Timer(token))
        }));
    }

    fn after_step(&mut self, ctx: &Context<Self>, result: game::Result<game::Step>) -> bool {
        if let Ok(step) = &result {
            if let Some(scheduled) = step.schedule {
                self.arm(ctx, scheduled);
            }
            if step.entered.contains(&game::Phase::Generating) {
                self.message = None;
            }
        }
        result.has_update()
    }

    fn after_select(&mut self, result: game::Result<game::SelectOutcome>) -> bool {
        if let Ok(game::SelectOutcome::Completed) = result {
            log::debug!("cluster found");
        }
        let updated = result.has_update();
        if updated {
            self.message = None;
        }
        updated
    }

    fn open_box(&mut self, ctx: &Context<Self>) -> bool {
        match self.engine.open_box(&ctx.props().progress) {
            Err(game::GameError::SelectionIncomplete) => {
                self.message = Some(INCORRECT);
                true
            }
            result => self.after_step(ctx, result),
        }
    }

    fn fire(&mut self, ctx: &Context<Self>, token: game::TimerToken) -> bool {
        self._phase_timer = None;

        // read the current fills, compute the new ones, hand them back whole
        let mut fills = ctx.props().progress.clone();
        let result = self.engine.fire(token, &mut fills);
        if let Ok(step) = &result {
            if step
                .entered
                .iter()
                .any(|phase| matches!(phase, game::Phase::Filled { .. }))
            {
                ctx.props().on_progress.emit(fills);
            }
            if step.last() == Some(game::Phase::Complete) {
                ctx.props().on_complete.emit(());
            }
        }
        self.after_step(ctx, result)
    }

    fn key_action(&self, key: &str) -> Option<Msg> {
        use game::Phase::*;
        match (key, self.engine.phase()) {
            ("Enter" | " ", AwaitingSelection) => Some(Msg::OpenBox),
            ("Enter" | " ", BoxOpen { .. }) => Some(Msg::Confirm),
            ("n" | "N", _) => Some(Msg::NewGrid),
            ("+" | "=", _) => Some(self.keyboard_zoom(1)),
            ("-", _) => Some(self.keyboard_zoom(-1)),
            ("Escape", _) => Some(Msg::Back),
            _ => None,
        }
    }

    /// Zooms around the cursor, or the viewport center without one.
    fn keyboard_zoom(&self, steps: i8) -> Msg {
        let cursor = self.viewport.cursor().unwrap_or_else(|| {
            let viewport = self.layout().viewport;
            game::Point::new(viewport.width / 2.0, viewport.height / 2.0)
        });
        Msg::Zoom { steps, cursor }
    }
}

impl Component for RefinementView {
    type Message = Msg;
    type Properties = RefinementProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut engine = game::RoundEngine::new(ctx.props().seed, game::RoundConfig::default());
        if let Err(err) = engine.start() {
            log::error!("could not start round: {}", err);
        }

        Self {
            engine,
            viewport: game::Viewport::default(),
            proximity: game::ProximityParams::default(),
            message: None,
            container: NodeRef::default(),
            _phase_timer: None,
            _hover_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        match msg {
            CellEvent(Down(index)) => {
                let result = self.engine.begin_drag(index);
                self.after_select(result)
            }
            CellEvent(Enter(index)) => {
                let result = self.engine.drag_over(index);
                self.after_select(result)
            }
            PointerUp => {
                let dragged = self.engine.end_drag();
                let panned = self.viewport.end_pan();
                dragged || panned
            }
            ViewportDown(pointer) => self.viewport.begin_pan(pointer),
            ViewportMove(pointer) => {
                let layout = self.layout();
                self.viewport.track_pointer(pointer, layout)
            }
            ViewportLeave => {
                self.engine.end_drag();
                self.viewport.end_pan();
                self.viewport.clear_cursor();
                true
            }
            Zoom { steps, cursor } => {
                let layout = self.layout();
                self.viewport
                    .zoom_at_cursor(steps, cursor, layout)
                    .has_update()
            }
            OpenBox => self.open_box(ctx),
            Confirm => {
                let result = self.engine.confirm();
                self.after_step(ctx, result)
            }
            NewGrid => {
                let result = self.engine.regenerate();
                if result.is_ok() {
                    self._phase_timer = None;
                }
                self.after_step(ctx, result)
            }
            Back => {
                ctx.props().on_back.emit(());
                false
            }
            Key(key) => match self.key_action(&key) {
                Some(msg) => Component::update(self, ctx, msg),
                None => false,
            },
            Timer(token) => self.fire(ctx, token),
            ReleaseHover => {
                self._hover_timer = None;
                self.viewport.release_hover()
            }
            Relayout => true,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let Some(element) = self.container.cast::<HtmlElement>() {
                if let Err(err) = element.focus() {
                    log::debug!("could not focus grid: {:?}", err);
                }
            }
        }

        // the zoomed grid is laid out now, put the anchor back under the cursor
        if self.viewport.has_pending_recompute() {
            let layout = self.layout();
            if self.viewport.apply_deferred(layout) {
                let link = ctx.link().clone();
                let millis = u32::try_from(game::HOVER_HOLD.as_millis()).unwrap_or(u32::MAX);
                self._hover_timer = Some(Timeout::new(millis, move || {
                    link.send_message(Msg::ReleaseHover)
                }));
                ctx.link().send_message(Msg::Relayout);
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.engine.teardown();
        self._phase_timer = None;
        self._hover_timer = None;
        self.viewport.reset();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let round = self.engine.round();
        let phase = self.engine.phase();
        let cell_px = game::CELL_PX * self.viewport.zoom().factor();
        let content = self
            .viewport
            .content_size(self.engine.config().content_size());
        let scroll = self.viewport.scroll();
        let cursor = self.viewport.effective_cursor();
        let found = round.cluster().iter().filter(|&index| round.selection().contains(index)).count();

        let container = &self.container;
        let onpointerdown = {
            let container = container.clone();
            ctx.link()
                .callback(move |e: PointerEvent| ViewportDown(local_point(&container, &e)))
        };
        let onpointermove = {
            let container = container.clone();
            ctx.link()
                .callback(move |e: PointerEvent| ViewportMove(local_point(&container, &e)))
        };
        let onpointerup = ctx.link().callback(|_: PointerEvent| PointerUp);
        let onpointerleave = ctx.link().callback(|_: PointerEvent| ViewportLeave);
        let onwheel = {
            let container = container.clone();
            ctx.link().batch_callback(move |e: WheelEvent| {
                e.prevent_default();
                let steps = wheel_steps(e.delta_y());
                (steps != 0).then(|| Zoom {
                    steps,
                    cursor: local_point(&container, &e),
                })
            })
        };
        let onkeydown = ctx.link().callback(|e: KeyboardEvent| Key(e.key()));
        let oncontextmenu = Callback::from(|e: MouseEvent| e.prevent_default());

        let cb_back = ctx.link().callback(|_: MouseEvent| Back);
        let cb_new_grid = ctx.link().callback(|_: MouseEvent| NewGrid);
        let cb_open = ctx.link().callback(|_: MouseEvent| OpenBox);
        let cb_confirm = ctx.link().callback(|_: MouseEvent| Confirm);
        let cell_callback = ctx.link().callback(CellEvent);

        let grid_style = format!(
            "width: {}px; height: {}px; transform: translate({}px, {}px);",
            content.width, content.height, -scroll.x, -scroll.y,
        );
        let viewport_class = classes!(
            "viewport",
            self.viewport.is_panning().then_some("panning"),
            self.viewport.is_hover_suppressed().then_some("zooming"),
        );

        html! {
            <div class="refinement">
                <header>
                    <button onclick={cb_back}>{"Back"}</button>
                    <h1>{"Macrodata Refinement"}</h1>
                    <button onclick={cb_new_grid} disabled={!phase.accepts_selection()}>{"New grid"}</button>
                </header>
                <div
                    class={viewport_class}
                    ref={container.clone()}
                    tabindex="0"
                    {onpointerdown}
                    {onpointermove}
                    {onpointerup}
                    {onpointerleave}
                    {onwheel}
                    {onkeydown}
                    {oncontextmenu}
                >
                    <div class="grid" style={grid_style}>
                        {
                            for round.cells().map(|cell| {
                                let center = self.viewport.cell_center(cell.coords, game::CELL_PX);
                                let scale = game::cell_scale(cursor, center, cell.is_found(), &self.proximity);
                                html! {
                                    <CellView
                                        key={cell.index}
                                        index={cell.index}
                                        coords={cell.coords}
                                        digit={cell.digit}
                                        found={cell.is_found()}
                                        deposit={deposit_class(cell.is_found(), phase)}
                                        {scale}
                                        size={cell_px}
                                        callback={cell_callback.clone()}
                                    />
                                }
                            })
                        }
                    </div>
                </div>
                <BoxesView fills={ctx.props().progress.fills().to_vec()} {phase}/>
                <footer>
                    <span class="found">{format!("{}/{}", found, round.cluster().len())}</span>
                    <button onclick={cb_open} disabled={!phase.accepts_selection()}>{"Open box"}</button>
                    <button onclick={cb_confirm} disabled={!matches!(phase, game::Phase::BoxOpen { .. })}>{"Confirm"}</button>
                    if let Some(message) = self.message {
                        <span class="error">{message}</span>
                    }
                </footer>
            </div>
        }
    }
}
