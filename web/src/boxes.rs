use macrodata_core as game;
use yew::prelude::*;

/// What a box is showing while a deposit plays out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum BoxState {
    Closed,
    Open,
    Depositing,
    Closing,
}

impl BoxState {
    pub(crate) fn for_box(index: usize, phase: game::Phase) -> Self {
        use game::Phase::*;
        match phase {
            BoxChosen { target } | BoxOpen { target } if target == index => Self::Open,
            Depositing { target } if target == index => Self::Depositing,
            Closing { target } | Filled { target, .. } if target == index => Self::Closing,
            _ => Self::Closed,
        }
    }

    const fn class(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Depositing => "depositing",
            Self::Closing => "closing",
        }
    }
}

pub(crate) fn box_label(index: usize) -> String {
    format!("{:02}", index + 1)
}

#[derive(Properties, Clone, PartialEq)]
struct BoxProps {
    index: usize,
    fill: game::Fill,
    state: BoxState,
}

#[function_component(BoxView)]
fn box_component(props: &BoxProps) -> Html {
    let BoxProps { index, fill, state } = props.clone();
    let full = fill >= game::FULL;

    html! {
        <div class={classes!("box", state.class(), full.then_some("full"))}>
            <div class="label">{box_label(index)}</div>
            <div class="fill-bar">
                <div class="fill" style={format!("width: {}%", fill)}/>
            </div>
            <div class="percent">{format!("{}%", fill)}</div>
            if full {
                <div class="full-indicator">{"Full"}</div>
            }
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct BoxesProps {
    pub fills: Vec<game::Fill>,
    pub phase: game::Phase,
}

#[function_component(BoxesView)]
pub(crate) fn boxes_component(props: &BoxesProps) -> Html {
    let phase = props.phase;
    html! {
        <div class="boxes">
            {
                for props.fills.iter().enumerate().map(|(index, &fill)| {
                    let state = BoxState::for_box(index, phase);
                    html! { <BoxView key={index} {index} {fill} {state}/> }
                })
            }
        </div>
    }
}
