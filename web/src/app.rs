use crate::refinement::RefinementView;
use crate::utils::*;
use game::BoxStore;
use macrodata_core as game;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    /// Seed for the first round, random when absent.
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Properties, Clone, PartialEq)]
struct CompleteProps {
    fills: Vec<game::Fill>,
    on_restart: Callback<()>,
    on_back: Callback<()>,
}

#[function_component(CompleteView)]
fn complete_component(props: &CompleteProps) -> Html {
    let on_restart = props.on_restart.reform(|_: MouseEvent| ());
    let on_back = props.on_back.reform(|_: MouseEvent| ());

    html! {
        <div class="complete">
            <h1>{"Refinement complete"}</h1>
            <p>{format!("All {} boxes are full.", props.fills.len())}</p>
            <div class="actions">
                <button onclick={on_restart}>{"Restart"}</button>
                <button onclick={on_back}>{"Back"}</button>
            </div>
        </div>
    }
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let progress = use_state(game::BoxFills::local_or_default);
    let seed = {
        let initial = props.seed;
        use_state(move || initial.unwrap_or_else(js_random_seed))
    };
    let complete = {
        let progress = progress.clone();
        use_state(move || progress.is_all_complete())
    };

    let on_progress = {
        let progress = progress.clone();
        Callback::from(move |fills: game::BoxFills| {
            log::debug!("progress: {:?}", fills.fills());
            fills.local_save();
            progress.set(fills);
        })
    };

    let on_complete = {
        let complete = complete.clone();
        Callback::from(move |()| {
            log::info!("all boxes full");
            complete.set(true);
        })
    };

    let on_back = Callback::from(|()| {
        if let Err(err) = gloo::utils::history().back() {
            log::error!("could not navigate back: {:?}", err);
        }
    });

    let on_restart = {
        let progress = progress.clone();
        let seed = seed.clone();
        let complete = complete.clone();
        Callback::from(move |()| {
            let mut fills = (*progress).clone();
            fills.reset_progress();
            fills.local_save();
            progress.set(fills);
            seed.set(js_random_seed());
            complete.set(false);
        })
    };

    if *complete {
        html! {
            <CompleteView fills={progress.fills().to_vec()} {on_restart} {on_back}/>
        }
    } else {
        html! {
            <RefinementView
                key={*seed}
                seed={*seed}
                progress={(*progress).clone()}
                {on_progress}
                {on_complete}
                {on_back}
            />
        }
    }
}
