use std::rc::Rc;

use web_sys::{HtmlCanvasElement, PointerEvent, WheelEvent};
use yew::prelude::*;

use super::browser;
use super::webgl::GlSurface;
use crate::config::SiteConfig;
use crate::events::BrowserEvents;
use crate::frame_loop;
use crate::scene::hero::{self, AmbientScene};
use crate::scene::{with_stage, SceneRuntime};

type HeroRuntime = SceneRuntime<AmbientScene, GlSurface>;

fn start_scene(canvas: HtmlCanvasElement, events: &BrowserEvents, config: &SiteConfig) -> Option<HeroRuntime> {
    let surface = match GlSurface::new(canvas.clone(), config.pixel_ratio(browser::device_pixel_ratio())) {
        Ok(surface) => surface,
        Err(err) => {
            log::info!("hero scene disabled: {err}");
            return None;
        }
    };

    let mut runtime = match hero::mount(surface, browser::viewport_size(), events) {
        Ok(runtime) => runtime,
        Err(err) => {
            log::info!("hero scene disabled: {err}");
            return None;
        }
    };
    let stage = runtime.stage()?;

    let weak = Rc::downgrade(&stage);
    let capture = canvas.clone();
    runtime.hold(browser::listen(&canvas, "pointerdown", move |event: PointerEvent| {
        with_stage(&weak, |stage| {
            let x = f64::from(event.client_x());
            let y = f64::from(event.client_y());
            if stage.model.orbit_pointer_down(event.button(), x, y) {
                let _ = capture.set_pointer_capture(event.pointer_id());
            }
        });
    }));

    let weak = Rc::downgrade(&stage);
    let measured = canvas.clone();
    runtime.hold(browser::listen(&canvas, "pointermove", move |event: PointerEvent| {
        let height = f64::from(measured.client_height());
        with_stage(&weak, |stage| {
            stage
                .model
                .orbit_pointer_move(f64::from(event.client_x()), f64::from(event.client_y()), height);
        });
    }));

    for kind in ["pointerup", "pointercancel"] {
        let weak = Rc::downgrade(&stage);
        runtime.hold(browser::listen(&canvas, kind, move |_: PointerEvent| {
            with_stage(&weak, |stage| stage.model.orbit_pointer_up());
        }));
    }

    let weak = Rc::downgrade(&stage);
    runtime.hold(browser::listen(&canvas, "wheel", move |event: WheelEvent| {
        event.prevent_default();
        with_stage(&weak, |stage| stage.model.orbit_wheel(event.delta_y()));
    }));

    let weak = Rc::downgrade(&stage);
    frame_loop::start(runtime.token(), move |time| {
        with_stage(&weak, |stage| stage.render(time));
    });

    Some(runtime)
}

#[function_component(Hero)]
pub fn hero_section() -> Html {
    let events = use_context::<BrowserEvents>().unwrap_or_default();
    let config = use_context::<SiteConfig>().unwrap_or_default();
    let canvas_ref = use_node_ref();
    let loaded = use_state(|| false);

    {
        let canvas_ref = canvas_ref.clone();
        let loaded = loaded.clone();
        use_effect_with((events, config), move |(events, config)| {
            let runtime = if config.hero_scene {
                canvas_ref
                    .cast::<HtmlCanvasElement>()
                    .and_then(|canvas| start_scene(canvas, events, config))
            } else {
                None
            };
            loaded.set(runtime.is_some());

            move || {
                if let Some(mut runtime) = runtime {
                    runtime.dispose();
                }
            }
        });
    }

    let explore = Callback::from(|_: MouseEvent| browser::scroll_to_section("about"));
    let chevron = Callback::from(|_: MouseEvent| browser::scroll_to_section("about"));

    html! {
        <section id="hero" class="hero">
            <canvas
                ref={canvas_ref}
                class={classes!("hero-canvas", (*loaded).then_some("is-loaded"))}
            />

            <div class="hero-copy">
                <h1 class="text-gradient">{"Full-Stack Developer"}</h1>
                <p class="hero-subtitle">{"Crafting immersive digital experiences"}</p>
                <div class="hero-actions">
                    <button class="button-primary" type="button" onclick={explore}>
                        {"Explore My Work"}
                    </button>
                    <a class="button-outline" href="#contact">{"Get In Touch"}</a>
                </div>
            </div>

            <button
                class="scroll-hint"
                type="button"
                aria-label="Scroll to about section"
                onclick={chevron}
            >
                <span aria-hidden="true">{"⌄"}</span>
            </button>
        </section>
    }
}
