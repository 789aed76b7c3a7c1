// Closed option sets offered by the lead forms.

pub const CONTACT_METHODS: &[&str] = &["WhatsApp", "Email", "Phone", "LinkedIn"];

pub const HOW_HEARD: &[&str] = &[
    "Google Search",
    "Social Media",
    "Referral",
    "LinkedIn",
    "Website",
    "Other",
];

/// Titles of the service cards; also the options of the demo and basic forms.
pub const SERVICES: &[&str] = &[
    "Web Development",
    "Mobile Apps",
    "AI/ML Solutions",
    "Career Services",
];

pub const PRICING_PLANS: &[&str] = &["Small", "Medium", "Large"];

pub const CAREER_SERVICES: &[&str] = &[
    "Resume Creation & Design",
    "LinkedIn Optimization",
    "Portfolio Website",
    "Mentorship & Coaching",
];

pub const EXPERIENCE_LEVELS: &[&str] = &["0-1", "1-3", "3-5", "5-10", "10+"];

pub const AVAILABILITY: &[&str] = &["full-time", "part-time", "contract", "freelance"];

pub const QUOTE_SERVICE_TYPES: &[&str] = &["web", "mobile", "ai", "career", "custom"];

pub const QUOTE_BUDGETS: &[&str] = &["small", "medium", "large", "enterprise"];

pub const SKILLS: &[&str] = &[
    "React", "Next.js", "Vue.js", "Angular", "Node.js", "Express.js",
    "Python", "Django", "Flask", "JavaScript", "TypeScript", "HTML/CSS",
    "Tailwind CSS", "MongoDB", "PostgreSQL", "MySQL", "Redis",
    "AWS", "Docker", "Kubernetes", "Git", "REST APIs", "GraphQL",
    "React Native", "Flutter", "Swift", "Kotlin", "Figma", "Adobe XD",
];
