//! Tech-stack detection from dependencies, file names, and README text.

/// Dependencies that map straight to a display name.
const DEP_LABELS: &[(&str, &str)] = &[
    ("react", "React"),
    ("next", "Next.js"),
    ("vite", "Vite"),
    ("@react-three/fiber", "react-three-fiber"),
    ("three", "three.js"),
    ("express", "Express"),
    ("typescript", "TypeScript"),
];

/// Tooling dependencies worth listing under their package name.
const TOOLING_DEPS: &[&str] = &["eslint", "prettier", "vitest", "jest", "react-router-dom", "tailwindcss"];

/// Only this many leading dependencies are checked against [`TOOLING_DEPS`].
const TOOLING_SCAN_DEPS: usize = 25;

/// Everything the detector looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechSignals<'a> {
    /// Sorted dependency names from `package.json`.
    pub deps: &'a [String],
    /// Lowercased base names of every file in the repo.
    pub file_names: &'a [String],
    /// README text, lowercased.
    pub readme_lower: &'a str,
    /// `package-lock.json` text, lowercased.
    pub lock_lower: &'a str,
}

impl TechSignals<'_> {
    fn has_dep(&self, name: &str) -> bool {
        self.deps.iter().any(|d| d == name)
    }

    fn any_file(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.file_names.iter().any(|f| pred(f))
    }

    fn uses_docker(&self) -> bool {
        self.any_file(|f| f == "dockerfile" || f == ".dockerfile" || f.starts_with("dockerfile."))
    }

    fn uses_compose(&self) -> bool {
        self.any_file(|f| f.starts_with("docker-compose"))
            || self.readme_lower.contains("docker compose")
            || self.readme_lower.contains("docker-compose")
    }

    fn uses_postgres(&self) -> bool {
        self.has_dep("pg") || self.readme_lower.contains("postgres")
    }

    fn uses_bedrock(&self) -> bool {
        self.readme_lower.contains("bedrock")
            || self.deps.iter().any(|d| d.starts_with("@aws-sdk/client-bedrock"))
            || self.has_dep("@aws-sdk/credential-providers")
            || self.lock_lower.contains("@langchain/aws")
            || self.lock_lower.contains("client-bedrock")
    }
}

/// Detect the tech stack, at most `max` entries (before deduplication).
#[must_use]
pub fn detect_tech(signals: &TechSignals<'_>, max: usize) -> Vec<String> {
    let mut tech: Vec<String> = DEP_LABELS
        .iter()
        .filter(|(dep, _)| signals.has_dep(dep))
        .map(|(_, label)| (*label).to_string())
        .collect();

    let infra = [
        (signals.uses_docker(), "Docker"),
        (signals.uses_compose(), "Docker Compose"),
        (signals.uses_postgres(), "Postgres"),
        (signals.readme_lower.contains("ollama"), "Ollama"),
        (signals.uses_bedrock(), "AWS Bedrock"),
    ];
    tech.extend(infra.iter().filter(|(hit, _)| *hit).map(|(_, label)| (*label).to_string()));

    for dep in signals.deps.iter().take(TOOLING_SCAN_DEPS) {
        if tech.len() >= max {
            break;
        }
        if TOOLING_DEPS.contains(&dep.as_str()) {
            tech.push(dep.clone());
        }
    }

    let mut seen = Vec::with_capacity(tech.len());
    tech.retain(|t| {
        if seen.contains(t) {
            false
        } else {
            seen.push(t.clone());
            true
        }
    });
    tech
}
