use std::rc::Rc;

use web_sys::{Element, HtmlCanvasElement};
use yew::prelude::*;

use super::browser;
use super::reveal::use_reveal;
use super::webgl::GlSurface;
use crate::config::SiteConfig;
use crate::content::{skill_by_name, SKILLS};
use crate::events::BrowserEvents;
use crate::frame_loop;
use crate::scene::skills::{self, SkillOrbit};
use crate::scene::{with_stage, SceneRuntime};

type SkillsRuntime = SceneRuntime<SkillOrbit, GlSurface>;

fn pause_label(paused: bool) -> &'static str {
    if paused {
        "▶ Resume"
    } else {
        "⏸ Pause"
    }
}

fn start_scene(
    canvas: HtmlCanvasElement,
    events: &BrowserEvents,
    config: &SiteConfig,
    paused: bool,
    on_hover: Callback<Option<&'static str>>,
) -> Option<SkillsRuntime> {
    let surface = match GlSurface::new(canvas.clone(), config.pixel_ratio(browser::device_pixel_ratio())) {
        Ok(surface) => surface,
        Err(err) => {
            log::info!("skills scene disabled: {err}");
            return None;
        }
    };

    let element: Element = canvas.into();
    let viewport = browser::element_rect(&element).viewport();
    let runtime = skills::mount(
        surface,
        &SKILLS,
        viewport,
        paused,
        events,
        move || Some(browser::element_rect(&element)),
        move |label| on_hover.emit(label),
    );

    let runtime = match runtime {
        Ok(runtime) => runtime,
        Err(err) => {
            log::info!("skills scene disabled: {err}");
            return None;
        }
    };
    let stage = runtime.stage()?;

    let weak = Rc::downgrade(&stage);
    frame_loop::start(runtime.token(), move |time| {
        with_stage(&weak, |stage| stage.render(time));
    });

    Some(runtime)
}

#[function_component(Skills)]
pub fn skills_section() -> Html {
    let events = use_context::<BrowserEvents>().unwrap_or_default();
    let config = use_context::<SiteConfig>().unwrap_or_default();
    let section_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let visible = use_reveal(section_ref.clone());
    let paused = {
        let start_paused = config.pause_on_reduced_motion && browser::prefers_reduced_motion();
        use_state(move || start_paused)
    };
    let hovered = use_state(|| None::<&'static str>);
    let runtime = use_mut_ref(|| SkillsRuntime::uninitialized("skills"));

    {
        let canvas_ref = canvas_ref.clone();
        let runtime = runtime.clone();
        let hovered = hovered.clone();
        let initially_paused = *paused;
        use_effect_with((visible, events, config), move |(visible, events, config)| {
            if *visible && config.skills_scene {
                let hovered = hovered.clone();
                let on_hover = Callback::from(move |label| hovered.set(label));
                if let Some(scene) = canvas_ref
                    .cast::<HtmlCanvasElement>()
                    .and_then(|canvas| start_scene(canvas, events, config, initially_paused, on_hover))
                {
                    *runtime.borrow_mut() = scene;
                }
            }

            move || {
                runtime.borrow_mut().dispose();
                hovered.set(None);
            }
        });
    }

    {
        let runtime = runtime.clone();
        use_effect_with(*paused, move |paused| {
            if let Some(stage) = runtime.borrow().stage() {
                with_stage(&Rc::downgrade(&stage), |stage| stage.model.set_paused(*paused));
            }
            || ()
        });
    }

    let on_toggle = {
        let paused = paused.clone();
        Callback::from(move |_: MouseEvent| paused.set(!*paused))
    };

    let hovered_category = (*hovered)
        .and_then(skill_by_name)
        .map(|skill| skill.category);

    html! {
        <section id="skills" ref={section_ref} class="section">
            <div class={classes!("reveal", visible.then_some("is-visible"))}>
                <h2 class="section-title text-gradient centered">{"Skills & Technologies"}</h2>

                <div class="skills-toolbar">
                    <p class="muted">{"Hover over the 3D icons to interact • Drag to rotate view"}</p>
                    <button class="pill-button" type="button" onclick={on_toggle} aria-pressed={(*paused).to_string()}>
                        {pause_label(*paused)}
                    </button>
                </div>

                <div class="skills-stage">
                    <div class="stage-glow" aria-hidden="true" />
                    <canvas ref={canvas_ref} class="skills-canvas" />
                    if let Some(label) = *hovered {
                        <div class="skills-hover-label" aria-live="polite">
                            <span class="text-gradient">{label}</span>
                            if let Some(category) = hovered_category {
                                <span class="muted">{category}</span>
                            }
                        </div>
                    }
                </div>

                <ul class="skills-grid">
                    { for SKILLS.iter().map(|skill| {
                        let active = *hovered == Some(skill.name);
                        html! {
                            <li key={skill.name} class={classes!("skill-card", active.then_some("is-active"))}>
                                <span class={classes!("skill-name", active.then_some("text-gradient"))}>{skill.name}</span>
                                <span class="muted">{skill.category}</span>
                            </li>
                        }
                    }) }
                </ul>
            </div>
        </section>
    }
}

