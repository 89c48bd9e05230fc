use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::reveal::use_reveal;
use crate::content::{ContactDraft, FEATURES, PROJECTS, SOCIAL_LINKS, STRENGTHS};

#[function_component(About)]
pub fn about() -> Html {
    let section_ref = use_node_ref();
    let visible = use_reveal(section_ref.clone());

    html! {
        <section id="about" ref={section_ref} class="section">
            <div class={classes!("reveal", visible.then_some("is-visible"))}>
                <h2 class="section-title text-gradient">{"About Me"}</h2>

                <div class="about-grid">
                    <div class="about-copy">
                        <p>
                            {"I'm a passionate full-stack developer who believes that great code is an art form. \
                              With expertise spanning from elegant frontends to robust backends, I create digital \
                              experiences that users love."}
                        </p>
                        <p>
                            {"My journey in web development has been driven by curiosity and a relentless pursuit \
                              of excellence. I thrive on challenges and continuously push the boundaries of what's \
                              possible on the web."}
                        </p>
                    </div>

                    <div class="card">
                        <h3 class="card-title">{"What I Bring"}</h3>
                        <ul class="strength-list">
                            { for STRENGTHS.iter().map(|strength| html! {
                                <li key={*strength}>
                                    <span class="marker" aria-hidden="true">{"▹"}</span>
                                    <span class="muted">{*strength}</span>
                                </li>
                            }) }
                        </ul>
                    </div>
                </div>

                <div class="feature-grid">
                    { for FEATURES.iter().map(|feature| html! {
                        <article key={feature.title} class="card feature-card">
                            <span class="feature-glyph" aria-hidden="true">{feature.glyph}</span>
                            <h3>{feature.title}</h3>
                            <p class="muted">{feature.description}</p>
                        </article>
                    }) }
                </div>
            </div>
        </section>
    }
}

#[function_component(Projects)]
pub fn projects() -> Html {
    let section_ref = use_node_ref();
    let visible = use_reveal(section_ref.clone());

    html! {
        <section id="projects" ref={section_ref} class="section">
            <div class={classes!("reveal", visible.then_some("is-visible"))}>
                <h2 class="section-title text-gradient centered">{"Featured Projects"}</h2>
                <p class="section-lead muted">{"Showcasing my latest work and innovations"}</p>

                <div class="project-grid">
                    { for PROJECTS.iter().map(|project| html! {
                        <article key={project.title} class={classes!("card", "project-card", project.accent)}>
                            <h3>{project.title}</h3>
                            <p class="muted">{project.description}</p>
                            <ul class="tag-list">
                                { for project.tech.iter().map(|tech| html! {
                                    <li key={*tech} class="tag">{*tech}</li>
                                }) }
                            </ul>
                            <div class="project-links">
                                <a class="link" href="#">{"Code"}</a>
                                <a class="link" href="#">{"Live Demo"}</a>
                            </div>
                        </article>
                    }) }
                </div>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct ContactProps {
    #[prop_or_default]
    pub on_submit: Callback<ContactDraft>,
}

#[function_component(Contact)]
pub fn contact(props: &ContactProps) -> Html {
    let section_ref = use_node_ref();
    let visible = use_reveal(section_ref.clone());
    let name_ref = use_node_ref();
    let email_ref = use_node_ref();
    let message_ref = use_node_ref();

    let onsubmit = {
        let name_ref = name_ref.clone();
        let email_ref = email_ref.clone();
        let message_ref = message_ref.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let (Some(name), Some(email), Some(message)) = (
                name_ref.cast::<HtmlInputElement>(),
                email_ref.cast::<HtmlInputElement>(),
                message_ref.cast::<HtmlTextAreaElement>(),
            ) else {
                return;
            };

            let draft = ContactDraft::new(&name.value(), &email.value(), &message.value());
            if draft.is_complete() {
                on_submit.emit(draft);
            }
        })
    };

    html! {
        <section id="contact" ref={section_ref} class="section">
            <div class={classes!("reveal", visible.then_some("is-visible"))}>
                <h2 class="section-title text-gradient centered">{"Let's Connect"}</h2>
                <p class="section-lead muted">{"Have a project in mind? Let's build something amazing together."}</p>

                <div class="contact-grid">
                    <form class="card contact-form" onsubmit={onsubmit}>
                        <label for="name">{"Name"}</label>
                        <input ref={name_ref} id="name" type="text" placeholder="Your name" required=true />

                        <label for="email">{"Email"}</label>
                        <input ref={email_ref} id="email" type="email" placeholder="your@email.com" required=true />

                        <label for="message">{"Message"}</label>
                        <textarea
                            ref={message_ref}
                            id="message"
                            rows="4"
                            placeholder="Tell me about your project..."
                            required=true
                        />

                        <button class="button-primary" type="submit">{"Send Message"}</button>
                    </form>

                    <div class="contact-aside">
                        <div class="card">
                            <h3 class="card-title">{"Get in Touch"}</h3>
                            <p class="muted">
                                {"I'm always open to discussing new projects, creative ideas, or opportunities \
                                  to be part of your vision."}
                            </p>
                            <p class="muted">{"✉ contact@example.com"}</p>
                            <p class="muted">{"📍 Available for remote work worldwide"}</p>
                        </div>

                        <div class="card">
                            <h3>{"Connect With Me"}</h3>
                            <div class="social-grid">
                                { for SOCIAL_LINKS.iter().map(|social| html! {
                                    <a key={social.label} class="social-link" href={social.href}>{social.label}</a>
                                }) }
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}
