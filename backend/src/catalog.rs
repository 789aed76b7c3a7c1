//! Content behind the marketing sections and the popup each card opens.

use serde::Serialize;

use crate::forms::{FormValues, FormVariant};

/// What a card asks for when clicked: a form variant and its prefilled values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupTrigger {
    pub variant: FormVariant,
    pub defaults: FormValues,
}

impl PopupTrigger {
    fn new(variant: FormVariant) -> Self {
        Self { variant, defaults: FormValues::new() }
    }

    fn with(mut self, field: &str, value: &str) -> Self {
        self.defaults.insert(field, value);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceCard {
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
    pub trigger: PopupTrigger,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingTier {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub price: &'static str,
    pub duration: &'static str,
    pub popular: bool,
    pub features: &'static [&'static str],
    pub trigger: PopupTrigger,
}

#[derive(Debug, Clone, Serialize)]
pub struct CareerOffering {
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub trigger: PopupTrigger,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub technologies: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub services: Vec<ServiceCard>,
    pub pricing: Vec<PricingTier>,
    pub career: Vec<CareerOffering>,
    pub projects: Vec<Project>,
    /// Hero "Get in touch", contact section, quote and hiring buttons.
    pub contact: PopupTrigger,
    pub custom_quote: PopupTrigger,
    pub join_team: PopupTrigger,
}

fn service(
    title: &'static str,
    description: &'static str,
    price: &'static str,
    features: &'static [&'static str],
) -> ServiceCard {
    ServiceCard {
        title,
        description,
        price,
        features,
        trigger: PopupTrigger::new(FormVariant::DemoRequest).with("demo", title),
    }
}

fn tier(
    name: &'static str,
    subtitle: &'static str,
    price: &'static str,
    duration: &'static str,
    popular: bool,
    features: &'static [&'static str],
) -> PricingTier {
    PricingTier {
        name,
        subtitle,
        price,
        duration,
        popular,
        features,
        trigger: PopupTrigger::new(FormVariant::PricingPlan).with("planInterested", name),
    }
}

fn career(title: &'static str, description: &'static str, price: &'static str) -> CareerOffering {
    CareerOffering {
        title,
        description,
        price,
        trigger: PopupTrigger::new(FormVariant::CareerService).with("interest", title),
    }
}

pub fn catalog() -> Catalog {
    Catalog {
        services: vec![
            service(
                "Web Development",
                "Modern, responsive websites and web applications.",
                "₹7000",
                &["Responsive design", "SEO optimization", "Performance tuning", "CMS integration"],
            ),
            service(
                "Mobile Apps",
                "Cross-platform mobile applications for iOS and Android.",
                "₹15000",
                &["Cross-platform", "Native performance", "App store deployment", "Push notifications"],
            ),
            service(
                "AI/ML Solutions",
                "Intelligent automation and machine learning integrations.",
                "₹20000",
                &["Chatbots", "Predictive analytics", "Data pipelines", "Model deployment"],
            ),
            service(
                "Career Services",
                "Professional career development and placement assistance.",
                "₹5,000",
                &["Resume design", "LinkedIn optimization", "Portfolio website", "Interview coaching", "Placement guidance"],
            ),
        ],
        pricing: vec![
            tier(
                "Small",
                "Perfect for startups",
                "₹15,000",
                "2-3 weeks",
                false,
                &["Single page application", "Responsive design", "Basic SEO optimization", "Contact form integration", "2 rounds of revisions", "Basic deployment", "1 month support"],
            ),
            tier(
                "Medium",
                "Most popular choice",
                "₹35,000",
                "4-6 weeks",
                true,
                &["Multi-page website/app", "Advanced UI/UX design", "Database integration", "Admin panel", "API development", "Payment gateway integration", "SEO & performance optimization", "3 months support"],
            ),
            tier(
                "Large",
                "Enterprise solution",
                "₹75,000",
                "8-12 weeks",
                false,
                &["Full-stack application", "Custom CMS/Dashboard", "Advanced features", "AI/ML integration", "Real-time functionality", "Multiple integrations", "Performance monitoring", "6 months support", "Dedicated project manager"],
            ),
        ],
        career: vec![
            career(
                "Resume Creation & Design",
                "Professional resume writing and design that gets you noticed by recruiters and hiring managers.",
                "₹2,500",
            ),
            career(
                "LinkedIn Optimization",
                "Complete LinkedIn profile optimization to attract opportunities and build professional network.",
                "₹3,500",
            ),
            career(
                "Portfolio Website",
                "Custom portfolio website to showcase your work and attract potential employers or clients.",
                "₹8,000",
            ),
            career(
                "Mentorship & Coaching",
                "One-on-one mentorship for interview preparation, career guidance, and skill development.",
                "₹5,000",
            ),
        ],
        projects: vec![
            Project {
                title: "E-commerce Platform",
                description: "Full-stack storefront with payments, inventory and an admin dashboard.",
                technologies: &["React", "Node.js", "MongoDB", "Stripe"],
            },
            Project {
                title: "Fitness Tracker App",
                description: "Cross-platform mobile app for fitness tracking with workout plans, progress tracking, and social features.",
                technologies: &["React Native", "Firebase", "Redux"],
            },
            Project {
                title: "AI Support Assistant",
                description: "Conversational assistant answering customer questions from a knowledge base.",
                technologies: &["Python", "FastAPI", "OpenAI", "PostgreSQL"],
            },
        ],
        contact: PopupTrigger::new(FormVariant::Basic),
        custom_quote: PopupTrigger::new(FormVariant::CustomQuote),
        join_team: PopupTrigger::new(FormVariant::JoinTeam),
    }
}
