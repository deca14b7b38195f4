use std::rc::Rc;

use web_sys::{window, MouseEvent};
use yew::prelude::*;

use crate::{
    browser::{self, BrowserPage, ElementById, NodeAnchor},
    content::{self, Job, Portfolio, Profile, Project},
    experience::{years_of_experience, DEFAULT_YEARS},
    layout::{watch_header, HeaderHeight, HEADER_ID},
    lightbox::{watch_escape, Lightbox, LightboxAction, OverlayClick},
    scroll::{scroll_to_section, scroll_to_top, watch_scroll, Section},
};

impl Reducible for Lightbox {
    type Action = LightboxAction;

    fn reduce(self: Rc<Self>, action: LightboxAction) -> Rc<Self> {
        let next = self.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[derive(Clone, PartialEq)]
struct SectionRefs {
    about: NodeRef,
    skills: NodeRef,
    experience: NodeRef,
    projects: NodeRef,
    contact: NodeRef,
}

impl SectionRefs {
    fn get(&self, section: Section) -> &NodeRef {
        match section {
            Section::About => &self.about,
            Section::Skills => &self.skills,
            Section::Experience => &self.experience,
            Section::Projects => &self.projects,
            Section::Contact => &self.contact,
        }
    }
}

#[hook]
fn use_section_refs() -> SectionRefs {
    SectionRefs {
        about: use_node_ref(),
        skills: use_node_ref(),
        experience: use_node_ref(),
        projects: use_node_ref(),
        contact: use_node_ref(),
    }
}

#[hook]
fn use_header_height() -> HeaderHeight {
    let height = use_state_eq(HeaderHeight::unmeasured);

    {
        let setter = height.setter();
        use_effect_with((), move |_| {
            let watch = BrowserPage::current().map(|page| {
                watch_header(
                    Rc::new(ElementById(HEADER_ID)),
                    &page,
                    Rc::new(move |measured: HeaderHeight| setter.set(measured)),
                )
            });
            move || drop(watch)
        });
    }

    *height
}

#[hook]
fn use_show_top() -> bool {
    let show_top = use_state_eq(|| false);

    {
        let setter = show_top.setter();
        use_effect_with((), move |_| {
            let guard = BrowserPage::current().map(|page| {
                watch_scroll(Rc::new(page.clone()), &page, Rc::new(move |visible: bool| setter.set(visible)))
            });
            move || drop(guard)
        });
    }

    *show_top
}

#[hook]
fn use_years_experience() -> i32 {
    let years = use_state_eq(|| DEFAULT_YEARS);

    {
        let setter = years.setter();
        use_effect_with((), move |_| {
            if let Some(today) = browser::today() {
                setter.set(years_of_experience(today));
            }
            || ()
        });
    }

    *years
}

#[hook]
fn use_lightbox() -> UseReducerHandle<Lightbox> {
    let lightbox = use_reducer(Lightbox::default);

    {
        let state = (*lightbox).clone();
        let dispatcher = lightbox.dispatcher();
        use_effect_with(lightbox.is_open(), move |_| {
            let guard = BrowserPage::current().and_then(|page| {
                watch_escape(
                    &state,
                    &page,
                    Rc::new(move || dispatcher.dispatch(LightboxAction::Key("Escape".to_string()))),
                )
            });
            move || drop(guard)
        });
    }

    lightbox
}

#[derive(Properties, PartialEq)]
struct SocialLinksProps {
    profile: Profile,
    #[prop_or_default]
    large: bool,
}

#[function_component(SocialLinks)]
fn social_links(props: &SocialLinksProps) -> Html {
    let profile = &props.profile;

    html! {
        <div class={classes!("social-links", props.large.then_some("is-large"))}>
            <a class="icon-link" href={profile.mailto()} aria-label="Email">
                <span aria-hidden="true">{"✉"}</span>
            </a>
            <a class="icon-link" href={profile.linkedin.clone()} target="_blank" rel="noopener noreferrer" aria-label="LinkedIn">
                <span aria-hidden="true">{"in"}</span>
            </a>
            <a class="icon-link" href={profile.github.clone()} target="_blank" rel="noopener noreferrer" aria-label="GitHub">
                <span aria-hidden="true">{"GH"}</span>
            </a>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SiteHeaderProps {
    profile: Profile,
    years: i32,
    on_navigate: Callback<Section>,
}

#[function_component(SiteHeader)]
fn site_header(props: &SiteHeaderProps) -> Html {
    html! {
        <header id={HEADER_ID} class="site-header">
            <h1>{props.profile.name.clone()}</h1>
            <p class="headline">
                {format!("{} | {}+ Years Experience", props.profile.headline, props.years)}
            </p>
            <nav class="section-nav">
                { for Section::ALL.iter().map(|&section| {
                    let on_navigate = props.on_navigate.clone();
                    html! {
                        <button class="nav-button" type="button" onclick={Callback::from(move |_: MouseEvent| on_navigate.emit(section))}>
                            {section.label()}
                        </button>
                    }
                }) }
            </nav>
            <SocialLinks profile={props.profile.clone()} />
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SectionBlockProps {
    section: Section,
    heading_ref: NodeRef,
    children: Html,
}

#[function_component(SectionBlock)]
fn section_block(props: &SectionBlockProps) -> Html {
    html! {
        <section class="section-block" aria-labelledby={props.section.id()}>
            <h2 id={props.section.id()} ref={props.heading_ref.clone()} class="section-heading">
                {props.section.label()}
            </h2>
            {props.children.clone()}
        </section>
    }
}

fn tag_list(tags: &[String], class: &'static str) -> Html {
    html! {
        <div class="tag-list">
            { for tags.iter().map(|tag| html! { <span class={class}>{tag.clone()}</span> }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct JobCardProps {
    job: Job,
}

#[function_component(JobCard)]
fn job_card(props: &JobCardProps) -> Html {
    let job = &props.job;

    html! {
        <div class="card">
            <h3>{format!("{} – {}", job.role, job.company)}</h3>
            <p class="muted period">{job.period.clone()}</p>
            if let Some(summary) = job.summary.as_ref() {
                <p class="summary">{summary.clone()}</p>
            }
            if !job.responsibilities.is_empty() {
                <ul class="responsibilities">
                    { for job.responsibilities.iter().map(|item| html! { <li>{item.clone()}</li> }) }
                </ul>
            }
            if !job.technologies.is_empty() {
                {tag_list(&job.technologies, "tag is-small")}
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    project: Project,
    on_select: Callback<String>,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let project = &props.project;
    let thumbnail = project.thumbnail_src().to_string();

    let onclick = {
        let on_select = props.on_select.clone();
        let thumbnail = thumbnail.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(thumbnail.clone()))
    };

    html! {
        <div class="card">
            <button class="thumbnail" type="button" onclick={onclick} aria-label={format!("Enlarge {} thumbnail", project.name)}>
                <picture>
                    <source srcset={thumbnail.clone()} type="image/avif" />
                    <img loading="lazy" src={thumbnail.clone()} alt={format!("{} thumbnail", project.name)} />
                </picture>
            </button>
            <h3>{project.name.clone()}</h3>
            <p class="muted">{project.description.clone()}</p>
            if !project.tech.is_empty() {
                {tag_list(&project.tech, "tag is-small")}
            }
            <div class="project-links">
                if let Some(link) = project.link.as_ref() {
                    <a class="link" href={link.clone()} target="_blank" rel="noopener noreferrer">{"View Project"}</a>
                }
                if let Some(github) = project.github.as_ref() {
                    <a class="link" href={github.clone()} target="_blank" rel="noopener noreferrer">{"GitHub"}</a>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ContactCardProps {
    profile: Profile,
}

#[function_component(ContactCard)]
fn contact_card(props: &ContactCardProps) -> Html {
    let profile = &props.profile;

    html! {
        <div class="card contact">
            <p>{"Email: "}<a class="link" href={profile.mailto()}>{profile.email.clone()}</a></p>
            <p>{format!("Phone: {}", profile.phone)}</p>
            <SocialLinks profile={profile.clone()} large={true} />
            <div class="resume">
                <a class="resume-button" href={profile.resume_url.clone()} target="_blank" rel="noopener noreferrer">
                    <span aria-hidden="true">{"📄"}</span>
                    <span>{"View PDF Resume"}</span>
                </a>
                <p class="muted small">{profile.resume_size_hint.clone()}</p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LightboxOverlayProps {
    image: AttrValue,
    on_click: Callback<OverlayClick>,
}

#[function_component(LightboxOverlay)]
fn lightbox_overlay(props: &LightboxOverlayProps) -> Html {
    let on_backdrop = {
        let on_click = props.on_click.clone();
        Callback::from(move |_: MouseEvent| on_click.emit(OverlayClick::Backdrop))
    };

    // Clicks inside the frame must not reach the backdrop handler.
    let on_frame = {
        let on_click = props.on_click.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_click.emit(OverlayClick::Image);
        })
    };

    let on_close = {
        let on_click = props.on_click.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_click.emit(OverlayClick::CloseButton);
        })
    };

    html! {
        <div class="lightbox-backdrop" onclick={on_backdrop}>
            <div class="lightbox-frame" onclick={on_frame}>
                <button class="lightbox-close" type="button" aria-label="Close image" onclick={on_close}>{"✕"}</button>
                <img class="lightbox-image" src={props.image.clone()} alt="Project" />
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    portfolio: Rc<Portfolio>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let portfolio = &props.portfolio;
    let refs = use_section_refs();
    let header_height = use_header_height();
    let show_top = use_show_top();
    let years = use_years_experience();
    let lightbox = use_lightbox();

    let on_navigate = {
        let refs = refs.clone();
        Callback::from(move |section: Section| {
            if let Some(page) = BrowserPage::current() {
                scroll_to_section(&NodeAnchor(refs.get(section)), &page, header_height);
            }
        })
    };

    let on_back_to_top = Callback::from(|_: MouseEvent| {
        if let Some(page) = BrowserPage::current() {
            scroll_to_top(&page);
        }
    });

    let on_select_image = {
        let dispatcher = lightbox.dispatcher();
        Callback::from(move |url: String| dispatcher.dispatch(LightboxAction::Select(url)))
    };

    let on_overlay_click = {
        let dispatcher = lightbox.dispatcher();
        Callback::from(move |click: OverlayClick| dispatcher.dispatch(LightboxAction::Click(click)))
    };

    let content_style = format!("padding-top: {:.0}px;", header_height.content_padding());

    html! {
        <div class="page-shell">
            <SiteHeader profile={portfolio.profile.clone()} years={years} on_navigate={on_navigate} />

            <main class="content" style={content_style}>
                <SectionBlock section={Section::About} heading_ref={refs.about.clone()}>
                    <div class="card">
                        <p class="lead">{portfolio.profile.about_text(years)}</p>
                    </div>
                </SectionBlock>

                <SectionBlock section={Section::Skills} heading_ref={refs.skills.clone()}>
                    <div class="card">{tag_list(&portfolio.skills, "tag")}</div>
                </SectionBlock>

                <SectionBlock section={Section::Experience} heading_ref={refs.experience.clone()}>
                    <div class="stack">
                        { for portfolio.experience.iter().map(|job| html! { <JobCard job={job.clone()} /> }) }
                    </div>
                </SectionBlock>

                <SectionBlock section={Section::Projects} heading_ref={refs.projects.clone()}>
                    <div class="stack">
                        { for portfolio.projects.iter().map(|project| html! {
                            <ProjectCard project={project.clone()} on_select={on_select_image.clone()} />
                        }) }
                    </div>
                </SectionBlock>

                <SectionBlock section={Section::Contact} heading_ref={refs.contact.clone()}>
                    <ContactCard profile={portfolio.profile.clone()} />
                </SectionBlock>
            </main>

            if show_top {
                <button class="back-to-top" type="button" aria-label="Back to top" onclick={on_back_to_top}>{"↑"}</button>
            }

            if let Some(image) = lightbox.image() {
                <LightboxOverlay image={AttrValue::from(image.to_string())} on_click={on_overlay_click} />
            }
        </div>
    }
}

pub fn run() {
    let portfolio = match content::load() {
        Ok(portfolio) => Rc::new(portfolio),
        Err(error) => {
            browser::log_error(&error.to_string());
            return;
        }
    };

    yew::Renderer::<App>::with_root_and_props(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
        AppProps { portfolio },
    )
    .render();
}
