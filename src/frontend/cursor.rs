use std::rc::Rc;

use yew::prelude::*;

use crate::events::BrowserEvents;
use crate::pointer::{PointerAction, PointerState};

impl Reducible for PointerState {
    type Action = PointerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

#[function_component(CustomCursor)]
pub fn custom_cursor() -> Html {
    let events = use_context::<BrowserEvents>().unwrap_or_default();
    let pointer = use_reducer(PointerState::default);

    {
        let dispatcher = pointer.dispatcher();
        use_effect_with(events, move |events| {
            let moves = {
                let dispatcher = dispatcher.clone();
                events
                    .pointer_move
                    .subscribe(move |event| dispatcher.dispatch(PointerAction::Moved(*event)))
            };
            let overs = events
                .pointer_over
                .subscribe(move |event| dispatcher.dispatch(PointerAction::Over(*event)));

            move || {
                drop(moves);
                drop(overs);
            }
        });
    }

    html! {
        <>
            <div class="cursor-ring" style={pointer.primary_transform()} aria-hidden="true">
                <div class="cursor-ring-inner" />
            </div>
            <div class="cursor-trail" style={pointer.trail_transform()} aria-hidden="true">
                <div class="cursor-trail-inner" />
            </div>
        </>
    }
}
