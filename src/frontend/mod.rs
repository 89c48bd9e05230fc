mod browser;
mod cursor;
mod hero;
mod reveal;
mod sections;
mod skills;
mod webgl;

use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::config::{ConfigError, SiteConfig, SITE_CONFIG_PATH};
use crate::content::ContactDraft;
use crate::events::BrowserEvents;
use cursor::CustomCursor;
use hero::Hero;
use sections::{About, Contact, Projects};
use skills::Skills;

async fn fetch_site_config() -> Result<SiteConfig, ConfigError> {
    let response = Request::get(SITE_CONFIG_PATH)
        .send()
        .await
        .map_err(|err| ConfigError::Unavailable(err.to_string()))?;

    if !response.ok() {
        return Err(ConfigError::Unavailable(format!("status {}", response.status())));
    }

    let document = response
        .text()
        .await
        .map_err(|err| ConfigError::Unavailable(err.to_string()))?;
    SiteConfig::from_json(&document)
}

#[function_component(App)]
fn app() -> Html {
    let events = use_memo((), |_| BrowserEvents::new());
    let config = use_state(SiteConfig::default);

    {
        let events = events.clone();
        use_effect_with((), move |_| {
            let bridge = browser::install_bridge(&events);
            move || drop(bridge)
        });
    }

    {
        let config = config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_site_config().await {
                    Ok(loaded) => {
                        log::set_max_level(loaded.log_level.as_filter());
                        log::debug!("site config loaded: {loaded:?}");
                        config.set(loaded);
                    }
                    Err(err) => log::debug!("using default site config: {err}"),
                }
            });
            || ()
        });
    }

    let on_contact = Callback::from(|draft: ContactDraft| {
        log::info!("contact draft from {} <{}>", draft.name, draft.email);
    });

    html! {
        <ContextProvider<BrowserEvents> context={(*events).clone()}>
            <ContextProvider<SiteConfig> context={(*config).clone()}>
                <CustomCursor />
                <main id="content">
                    <Hero />
                    <About />
                    <Projects />
                    <Skills />
                    <Contact on_submit={on_contact} />
                </main>
            </ContextProvider<SiteConfig>>
        </ContextProvider<BrowserEvents>>
    }
}

pub fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log::warn!("missing #app mount point; rendering into <body>");
        yew::Renderer::<App>::new().render();
        return;
    };

    yew::Renderer::<App>::with_root(root).render();
}
