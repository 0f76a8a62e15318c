//! Landing page component
//!
//! The Feva marketing page. Its markup is the contract the effects runtime
//! binds to:
//! - Header with `#site-header`, `#main-nav` `.nav-item` links, theme and
//!   mobile menu toggles, and a `.scroll-progress` bar
//! - Hero with `.hero-pattern`, `.floating-icon`s, `#hero-particles`,
//!   `#matrixRain` and `.stat-item .stat-number` counters
//! - Roadmap `.roadmap-container` with a `.roadmap-line` path and numbered
//!   `.roadmap-step[data-step]` entries
//! - Technology globe `#techGlobe` with `.tech-icon[data-tech]` and the
//!   `#techInfoPanel`
//! - Testimonial carousel and a `#back-to-top` button

use leptos::prelude::*;
use leptos_meta::{Link, Meta, Title};

use crate::ui::effects::PageEffects;
use crate::ui::theme::ThemeToggle;

const NAV: [(&str, &str); 5] = [
    ("#services", "Services"),
    ("#roadmap", "Roadmap"),
    ("#technologies", "Technologies"),
    ("#testimonials", "Testimonials"),
    ("#contact", "Contact"),
];

const STATS: [(&str, &str); 4] = [
    ("150+", "Projects delivered"),
    ("98%", "Client retention"),
    ("12", "Cloud certifications"),
    ("40+", "Engineers"),
];

const STEPS: [(u32, &str, &str); 5] = [
    (
        1,
        "Discovery",
        "We map your current systems, delivery pipeline and the goals the platform has to serve.",
    ),
    (
        2,
        "Architecture",
        "A target design for cloud, data and security, with a migration path you can budget for.",
    ),
    (
        3,
        "Foundation",
        "Infrastructure as code, CI/CD and observability land before the first workload moves.",
    ),
    (
        4,
        "Migration",
        "Services move in small, reversible batches with automated checks at every stage.",
    ),
    (
        5,
        "Optimization",
        "Cost, performance and reliability reviews keep the platform improving after launch.",
    ),
];

/// Icon keys and labels placed around the globe
const TECHNOLOGIES: [(&str, &str); 10] = [
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("docker", "Docker"),
    ("kubernetes", "K8s"),
    ("terraform", "TF"),
    ("ansible", "Ansible"),
    ("jenkins", "Jenkins"),
    ("rust", "Rust"),
    ("postgresql", "Postgres"),
];

const TESTIMONIALS: [(&str, &str, &str); 3] = [
    (
        "Feva moved our monolith to Kubernetes without a single customer-facing outage.",
        "Dana Whitfield",
        "CTO, Northwind Logistics",
    ),
    (
        "Deploys went from a monthly event to something we do a dozen times a day.",
        "Ravi Menon",
        "Head of Engineering, Lumen Health",
    ),
    (
        "Our cloud bill dropped by a third in the first quarter after their review.",
        "Sofia Álvarez",
        "VP Operations, Brightpath",
    ),
];

/// Landing page with every scroll and ambient effect
#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <SeoMeta />
        <LandingStyles />

        <Header />

        <main>
            <Hero />
            <Services />
            <Roadmap />
            <Technologies />
            <Testimonials />
            <Contact />
        </main>

        <button id="back-to-top" class="back-to-top" type="button" aria-label="Back to top">
            "↑"
        </button>

        <PageEffects />
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <header id="site-header" class="site-header">
            <div class="header-inner">
                <a href="#home" class="logo">"Feva"</a>

                <nav id="main-nav" class="main-nav">
                    <ul class="nav-menu">
                        {NAV
                            .iter()
                            .map(|(href, label)| {
                                view! {
                                    <li class="nav-item">
                                        <a href=*href>{*label}</a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </nav>

                <div class="header-actions">
                    <ThemeToggle />
                    <button
                        id="mobile-menu-toggle"
                        class="mobile-menu-toggle"
                        type="button"
                        aria-label="Toggle mobile menu"
                    >
                        <span></span>
                        <span></span>
                        <span></span>
                    </button>
                </div>
            </div>
            <div class="scroll-progress"></div>
        </header>
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section id="home" class="hero">
            <div class="hero-pattern" aria-hidden="true"></div>
            <div id="matrixRain" class="matrix-rain" aria-hidden="true"></div>
            <div id="hero-particles" class="hero-particles" aria-hidden="true"></div>

            <div class="floating-icon floating-icon-1" aria-hidden="true">"☁"</div>
            <div class="floating-icon floating-icon-2" aria-hidden="true">"⚙"</div>
            <div class="floating-icon floating-icon-3" aria-hidden="true">"⛁"</div>

            <div class="hero-content">
                <h1>"Cloud platforms that ship."</h1>
                <p class="hero-lead">
                    "Feva designs, builds and runs the infrastructure behind fast-moving product teams."
                </p>
                <a href="#contact" class="btn-cta">"Start a project"</a>

                <div class="hero-stats">
                    {STATS
                        .iter()
                        .map(|(number, label)| {
                            view! {
                                <div class="stat-item">
                                    <span class="stat-number">{*number}</span>
                                    <span class="stat-label">{*label}</span>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </section>
    }
}

#[component]
fn Services() -> impl IntoView {
    view! {
        <section id="services" class="section services">
            <h2>"What we do"</h2>
            <div class="service-grid">
                <article class="service-card">
                    <div class="service-icon" aria-hidden="true">"☁"</div>
                    <h3>"Cloud migration"</h3>
                    <p>"Lift, refactor or rebuild, planned around the way your teams release."</p>
                </article>
                <article class="service-card">
                    <div class="service-icon" aria-hidden="true">"⚙"</div>
                    <h3>"Platform engineering"</h3>
                    <p>"Paved roads for deploys, secrets, observability and on-call."</p>
                </article>
                <article class="service-card">
                    <div class="service-icon" aria-hidden="true">"◎"</div>
                    <h3>"Managed operations"</h3>
                    <p>"Round-the-clock monitoring with engineers who know your stack."</p>
                </article>
            </div>
        </section>
    }
}

#[component]
fn Roadmap() -> impl IntoView {
    view! {
        <section id="roadmap" class="section roadmap">
            <h2>"How an engagement runs"</h2>
            <div class="roadmap-container">
                <svg class="roadmap-svg" viewBox="0 0 4 2000" preserveAspectRatio="none" aria-hidden="true">
                    <path class="roadmap-line" d="M2 0 L2 2000" />
                </svg>

                {STEPS
                    .iter()
                    .map(|(number, title, description)| {
                        view! {
                            <div class="roadmap-step" data-step=number.to_string()>
                                <div class="step-marker">
                                    <span class="step-pulse"></span>
                                    <span class="step-number">{*number}</span>
                                </div>
                                <div class="step-content">
                                    <h3 class="step-title">{*title}</h3>
                                    <p class="step-description">{*description}</p>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn Technologies() -> impl IntoView {
    let count = TECHNOLOGIES.len() as f64;

    view! {
        <section id="technologies" class="section technologies">
            <h2>"Technologies we run"</h2>
            <div class="globe-stage">
                <div id="techGlobe" class="tech-globe">
                    {TECHNOLOGIES
                        .iter()
                        .enumerate()
                        .map(|(i, (key, label))| {
                            // Spread icons over the sphere: longitude by index, latitude alternating
                            let longitude = 360.0 * i as f64 / count;
                            let latitude = if i % 2 == 0 { 25.0 } else { -25.0 };
                            let style = format!(
                                "transform: rotateY({longitude:.1}deg) rotateX({latitude:.1}deg) translateZ(160px);"
                            );
                            view! {
                                <div class="tech-icon" data-tech=*key style=style>
                                    {*label}
                                </div>
                            }
                        })
                        .collect_view()}
                </div>

                <div id="techInfoPanel" class="tech-info-panel">
                    <h3 id="techName">"Hover over a technology"</h3>
                    <p id="techDescription">
                        "Select a technology icon to learn more about our expertise."
                    </p>
                </div>
            </div>
        </section>
    }
}

#[component]
fn Testimonials() -> impl IntoView {
    view! {
        <section id="testimonials" class="section testimonials">
            <h2>"What clients say"</h2>
            <div class="testimonial-track">
                {TESTIMONIALS
                    .iter()
                    .map(|(quote, name, role)| {
                        view! {
                            <blockquote class="testimonial-card">
                                <p>{*quote}</p>
                                <footer>
                                    <strong>{*name}</strong>
                                    <span>{*role}</span>
                                </footer>
                            </blockquote>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="testimonial-dots">
                {(0..TESTIMONIALS.len())
                    .map(|i| {
                        let label = format!("Show testimonial {}", i + 1);
                        view! { <button class="dot" type="button" aria-label=label></button> }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn Contact() -> impl IntoView {
    view! {
        <section id="contact" class="section contact">
            <h2>"Let's talk"</h2>
            <p>"Tell us where your platform is today and where it needs to be."</p>
            <a href="mailto:hello@feva.io" class="btn-cta">"hello@feva.io"</a>
            <p class="copyright">"© 2025 Feva"</p>
        </section>
    }
}

/// SEO meta tags component
#[component]
fn SeoMeta() -> impl IntoView {
    view! {
        // Page title
        <Title text="Feva - Cloud Platform Engineering" />

        // Basic meta tags
        <Meta name="description" content="Feva designs, builds and runs cloud platforms for product teams: migration, platform engineering and managed operations." />
        <Meta name="keywords" content="cloud migration, platform engineering, kubernetes, terraform, devops consulting, managed operations" />

        // Open Graph
        <Meta property="og:type" content="website" />
        <Meta property="og:url" content="https://feva.io/" />
        <Meta property="og:title" content="Feva - Cloud Platform Engineering" />
        <Meta property="og:description" content="Cloud platforms that ship. Migration, platform engineering and managed operations." />

        // Canonical URL
        <Link rel="canonical" href="https://feva.io/" />

        // JSON-LD Structured Data (inline script)
        <script type="application/ld+json" inner_html=r#"{"@context":"https://schema.org","@type":"Organization","name":"Feva","url":"https://feva.io","description":"Cloud platform engineering: migration, platform engineering and managed operations","email":"hello@feva.io"}"#></script>
    }
}

/// Styles the effects depend on: keyframes, state classes and themes
#[component]
fn LandingStyles() -> impl IntoView {
    view! {
        <style>
            r#"
            :root {
                --bg: #ffffff;
                --text: #1a1a1a;
                --muted: #5b6470;
                --accent: #05b305;
                --surface: #f4f6f8;
            }
            [data-theme="dark"] {
                --bg: #0d1117;
                --text: #e6edf3;
                --muted: #8b949e;
                --surface: #161b22;
            }
            body {
                margin: 0;
                font-family: system-ui, sans-serif;
                background: var(--bg);
                color: var(--text);
            }
            body.nav-open { overflow: hidden; }
            .section { padding: 6rem 1.5rem; max-width: 1100px; margin: 0 auto; }

            /* Header */
            .site-header {
                position: fixed; top: 0; left: 0; right: 0; z-index: 50;
                background: var(--bg);
                transition: padding 0.3s ease, box-shadow 0.3s ease;
            }
            .site-header.scrolled .header-inner { padding: 0.5rem 1.5rem; }
            .header-inner {
                display: flex; align-items: center; justify-content: space-between;
                padding: 1rem 1.5rem; transition: padding 0.3s ease;
            }
            .logo { font-weight: 700; font-size: 1.5rem; color: var(--accent); text-decoration: none; }
            .nav-menu { display: flex; gap: 1.5rem; list-style: none; margin: 0; padding: 0; }
            .nav-item a { color: var(--muted); text-decoration: none; }
            .nav-item.active a { color: var(--accent); }
            .header-actions { display: flex; align-items: center; gap: 0.75rem; }
            .theme-toggle { position: relative; width: 36px; height: 36px; background: none; border: 0; color: var(--text); cursor: pointer; }
            .theme-toggle span { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; transition: opacity 0.3s ease; }
            .dark-icon { opacity: 0; }
            .mobile-menu-toggle { display: none; flex-direction: column; gap: 4px; background: none; border: 0; cursor: pointer; }
            .mobile-menu-toggle span { width: 22px; height: 2px; background: var(--text); transition: transform 0.3s ease; }
            .mobile-menu-toggle.active span:nth-child(1) { transform: translateY(6px) rotate(45deg); }
            .mobile-menu-toggle.active span:nth-child(2) { opacity: 0; }
            .mobile-menu-toggle.active span:nth-child(3) { transform: translateY(-6px) rotate(-45deg); }
            .scroll-progress { height: 3px; width: 0; background: var(--accent); }
            @media (max-width: 768px) {
                .mobile-menu-toggle { display: flex; }
                .main-nav { position: fixed; top: 64px; left: 0; right: 0; background: var(--bg); transform: translateY(-120%); transition: transform 0.3s ease; }
                .main-nav.mobile-active { transform: translateY(0); }
                .nav-menu { flex-direction: column; padding: 1.5rem; }
            }

            /* Hero */
            .hero { position: relative; min-height: 100vh; display: flex; align-items: center; justify-content: center; overflow: hidden; }
            .hero-pattern { position: absolute; inset: -20% 0 0 0; background-image: radial-gradient(var(--accent) 1px, transparent 1px); background-size: 32px 32px; opacity: 0.08; }
            .hero-particles, .matrix-rain { position: absolute; inset: 0; pointer-events: none; overflow: hidden; }
            .hero-content { position: relative; text-align: center; padding: 0 1.5rem; }
            .hero-content h1 { font-size: clamp(2.5rem, 6vw, 4.5rem); margin: 0 0 1rem; }
            .hero-lead { color: var(--muted); font-size: 1.25rem; }
            .btn-cta { display: inline-block; margin-top: 1.5rem; padding: 0.9rem 1.8rem; border-radius: 0.5rem; background: var(--accent); color: #fff; text-decoration: none; font-weight: 600; }
            .hero-stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1.5rem; margin-top: 3rem; }
            .stat-number { display: block; font-size: 2rem; font-weight: 700; color: var(--accent); }
            .stat-label { color: var(--muted); font-size: 0.9rem; }
            .floating-icon { position: absolute; font-size: 2.5rem; opacity: 0.25; transition: transform 0.1s linear; }
            .floating-icon-1 { top: 20%; left: 10%; }
            .floating-icon-2 { top: 60%; right: 12%; }
            .floating-icon-3 { bottom: 15%; left: 20%; }
            .particle { border-radius: 50%; pointer-events: none; }
            @keyframes particleFloat {
                0% { transform: translate(0, 0); opacity: 0; }
                10% { opacity: 1; }
                90% { opacity: 1; }
                100% { transform: translate(var(--drift), -100vh); opacity: 0; }
            }
            .matrix-column { position: absolute; top: -100%; display: flex; flex-direction: column; font-family: monospace; font-size: 14px; line-height: 1.2; color: var(--accent); opacity: 0.15; animation-name: matrixFall; animation-timing-function: linear; animation-iteration-count: infinite; }
            .matrix-character.highlight { color: #fff; text-shadow: 0 0 6px var(--accent); }
            @keyframes matrixFall {
                from { transform: translateY(0); }
                to { transform: translateY(200%); }
            }

            /* Services */
            .service-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1.5rem; }
            .service-card { padding: 1.5rem; border-radius: 0.75rem; background: var(--surface); }
            .service-icon { display: inline-block; font-size: 2rem; color: var(--accent); transition: transform 0.3s ease; }

            /* Roadmap */
            .roadmap-container { position: relative; padding-left: 3rem; }
            .roadmap-svg { position: absolute; top: 0; bottom: 0; left: 1rem; width: 4px; height: 100%; overflow: visible; }
            .roadmap-line { fill: none; stroke: var(--accent); stroke-width: 4; stroke-dasharray: 2000; stroke-dashoffset: 2000; }
            .roadmap-step { position: relative; margin-bottom: 3rem; opacity: 0; transform: translateX(-20px); transition: opacity 0.6s ease, transform 0.6s ease; }
            .roadmap-step.visible { opacity: 1; transform: translateX(0); }
            .step-marker { position: absolute; left: -3rem; top: 0; width: 2.25rem; height: 2.25rem; border-radius: 50%; background: var(--accent); color: #fff; display: flex; align-items: center; justify-content: center; font-weight: 700; }
            .step-pulse { position: absolute; inset: 0; border-radius: 50%; border: 2px solid var(--accent); }
            @keyframes pulse {
                0% { transform: scale(1); opacity: 0.8; }
                100% { transform: scale(1.8); opacity: 0; }
            }
            .step-title { margin: 0 0 0.5rem; min-height: 1.4em; }
            .step-description { color: var(--muted); margin: 0; min-height: 3em; }
            .typing-text::after { content: "|"; margin-left: 2px; animation: caret 0.8s step-end infinite; }
            @keyframes caret { 50% { opacity: 0; } }

            /* Technology globe */
            .globe-stage { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; align-items: center; perspective: 1000px; }
            .tech-globe { position: relative; width: 320px; height: 320px; margin: 0 auto; transform-style: preserve-3d; cursor: grab; user-select: none; }
            .tech-icon { position: absolute; top: 50%; left: 50%; margin: -24px 0 0 -24px; width: 48px; height: 48px; border-radius: 50%; background: var(--surface); display: flex; align-items: center; justify-content: center; font-size: 0.7rem; font-weight: 600; backface-visibility: hidden; }
            .tech-icon:hover { background: var(--accent); color: #fff; }
            .tech-info-panel { padding: 1.5rem; border-radius: 0.75rem; background: var(--surface); transition: all 0.3s ease; }

            /* Testimonials */
            .testimonial-track { position: relative; min-height: 180px; }
            .testimonial-card { position: absolute; inset: 0; margin: 0; padding: 2rem; border-radius: 0.75rem; background: var(--surface); opacity: 0; transition: opacity 0.5s ease; }
            .testimonial-card.active { opacity: 1; }
            .testimonial-card footer { margin-top: 1rem; display: flex; flex-direction: column; color: var(--muted); }
            .testimonial-dots { display: flex; justify-content: center; gap: 0.5rem; margin-top: 1.5rem; }
            .dot { width: 10px; height: 10px; border-radius: 50%; border: 0; background: var(--muted); opacity: 0.4; cursor: pointer; }
            .dot.active { background: var(--accent); opacity: 1; }

            /* Contact */
            .contact { text-align: center; }
            .copyright { margin-top: 3rem; color: var(--muted); font-size: 0.85rem; }

            /* Back to top */
            .back-to-top { position: fixed; right: 1.5rem; bottom: 1.5rem; width: 44px; height: 44px; border-radius: 50%; border: 0; background: var(--accent); color: #fff; font-size: 1.25rem; cursor: pointer; opacity: 0; visibility: hidden; transition: opacity 0.3s ease, visibility 0.3s ease; }
            .back-to-top.visible { opacity: 1; visibility: visible; }

            @media (max-width: 768px) {
                .hero-stats { grid-template-columns: repeat(2, 1fr); }
                .globe-stage { grid-template-columns: 1fr; }
            }
            "#
        </style>
    }
}
