#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconShape {
    Shield { half_width: u8 },
    Cube,
    Atom,
    HexPrism,
    Leaf,
    Elephant,
    Octahedron,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
    pub color: u32,
    pub category: &'static str,
    pub icon: IconShape,
}

pub static SKILLS: [Skill; 8] = [
    Skill {
        name: "HTML5",
        color: 0xe34c26,
        category: "Frontend",
        icon: IconShape::Shield { half_width: 60 },
    },
    Skill {
        name: "CSS3",
        color: 0x264de4,
        category: "Frontend",
        icon: IconShape::Shield { half_width: 65 },
    },
    Skill {
        name: "JavaScript",
        color: 0xf7df1e,
        category: "Frontend",
        icon: IconShape::Cube,
    },
    Skill {
        name: "React",
        color: 0x61dafb,
        category: "Frontend",
        icon: IconShape::Atom,
    },
    Skill {
        name: "Node.js",
        color: 0x339933,
        category: "Backend",
        icon: IconShape::HexPrism,
    },
    Skill {
        name: "TypeScript",
        color: 0x3178c6,
        category: "Frontend",
        icon: IconShape::Cube,
    },
    Skill {
        name: "MongoDB",
        color: 0x47a248,
        category: "Database",
        icon: IconShape::Leaf,
    },
    Skill {
        name: "PostgreSQL",
        color: 0x336791,
        category: "Database",
        icon: IconShape::Elephant,
    },
];

pub struct Feature {
    pub glyph: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        glyph: "</>",
        title: "Clean Code",
        description: "Writing maintainable, scalable code that stands the test of time",
    },
    Feature {
        glyph: "✦",
        title: "Creative Solutions",
        description: "Transforming complex problems into elegant digital experiences",
    },
    Feature {
        glyph: "➚",
        title: "Performance",
        description: "Optimizing every interaction for lightning-fast user experiences",
    },
];

pub const STRENGTHS: [&str; 3] = [
    "5+ years of full-stack development experience",
    "Strong focus on UI/UX and performance optimization",
    "Passionate about clean architecture and best practices",
];

pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub tech: &'static [&'static str],
    pub accent: &'static str,
}

pub const PROJECTS: [Project; 4] = [
    Project {
        title: "E-Commerce Platform",
        description: "Full-stack e-commerce solution with real-time inventory, payment processing, and admin dashboard.",
        tech: &["React", "Node.js", "MongoDB", "Stripe"],
        accent: "accent-primary",
    },
    Project {
        title: "Social Media Dashboard",
        description: "Analytics dashboard for social media management with real-time data visualization and automated reporting.",
        tech: &["Next.js", "PostgreSQL", "GraphQL", "D3.js"],
        accent: "accent-secondary",
    },
    Project {
        title: "AI-Powered Chatbot",
        description: "Intelligent chatbot using natural language processing for customer support automation.",
        tech: &["Python", "TensorFlow", "React", "WebSocket"],
        accent: "accent-tertiary",
    },
    Project {
        title: "Project Management Tool",
        description: "Collaborative project management platform with real-time updates, task tracking, and team collaboration features.",
        tech: &["Vue.js", "Express", "MySQL", "Socket.io"],
        accent: "accent-blend",
    },
];

pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SOCIAL_LINKS: [SocialLink; 4] = [
    SocialLink {
        label: "GitHub",
        href: "#",
    },
    SocialLink {
        label: "LinkedIn",
        href: "#",
    },
    SocialLink {
        label: "Twitter",
        href: "#",
    },
    SocialLink {
        label: "Email",
        href: "mailto:contact@example.com",
    },
];

/// What the visitor typed into the contact form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.email.contains('@') && !self.message.is_empty()
    }
}

pub fn skill_by_name(name: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|skill| skill.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_names_are_unique() {
        for (index, skill) in SKILLS.iter().enumerate() {
            assert!(
                SKILLS[index + 1..].iter().all(|other| other.name != skill.name),
                "duplicate skill {}",
                skill.name
            );
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(skill_by_name("React").map(|skill| skill.icon), Some(IconShape::Atom));
        assert!(skill_by_name("COBOL").is_none());
    }

    #[test]
    fn contact_draft_trims_and_checks_fields() {
        let draft = ContactDraft::new("  Ada ", "ada@example.com", " Hello there ");
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.message, "Hello there");
        assert!(draft.is_complete());

        assert!(!ContactDraft::new("Ada", "not-an-address", "Hi").is_complete());
        assert!(!ContactDraft::new("Ada", "ada@example.com", "   ").is_complete());
    }
}
