//! Built-in Module Registration Table
//!
//! The fixed set of technology definitions compiled into the binary. Adding
//! a technology means adding a `ModuleDef` here and its fragments under
//! `compose/packs/`; no runtime discovery, no dynamic loading.

use std::sync::Arc;

use super::declarative::DeclarativeModule;
use super::def::{
    CommandTemplates, DetectSignal, ModuleDef, VersionGranularity, VersionProbe,
};
use super::SharedModule;
use crate::constants::detection::weights;
use crate::types::{Ecosystem, ModuleKind, PriorityClass};

// =============================================================================
// Meta-frameworks
// =============================================================================

static NEXTJS: ModuleDef = ModuleDef {
    id: "nextjs",
    display_name: "Next.js",
    kind: ModuleKind::Framework,
    priority: PriorityClass::MetaFramework,
    keywords: &["next", "react", "ssr", "app-router"],
    supported_versions: &["13", "14", "15"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "next",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "next.config.js",
            weight: weights::CONFIG_FILE,
        },
        DetectSignal::ConfigFile {
            name: "next.config.mjs",
            weight: weights::CONFIG_FILE,
        },
        DetectSignal::ConfigFile {
            name: "next.config.ts",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &["react"],
    guideline_dir: "nextjs",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "next",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &["{pm} run build"],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

static NUXT: ModuleDef = ModuleDef {
    id: "nuxt",
    display_name: "Nuxt",
    kind: ModuleKind::Framework,
    priority: PriorityClass::MetaFramework,
    keywords: &["nuxt", "vue", "ssr"],
    supported_versions: &["3", "4"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "nuxt",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "nuxt.config.ts",
            weight: weights::CONFIG_FILE,
        },
        DetectSignal::ConfigFile {
            name: "nuxt.config.js",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &["vuejs"],
    guideline_dir: "nuxt",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "nuxt",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &["{pm} run build"],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

// =============================================================================
// Frameworks
// =============================================================================

static REACT: ModuleDef = ModuleDef {
    id: "react",
    display_name: "React",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["react", "jsx", "hooks", "components"],
    supported_versions: &["18", "19"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "react",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::FileExtension {
            ext: "tsx",
            weight: weights::FILE_EXTENSION,
        },
        DetectSignal::FileExtension {
            ext: "jsx",
            weight: weights::FILE_EXTENSION,
        },
    ],
    excludes: &[],
    guideline_dir: "react",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "react",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &["{pm} run build"],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

static VUEJS: ModuleDef = ModuleDef {
    id: "vuejs",
    display_name: "Vue.js",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["vue", "sfc", "composition-api"],
    supported_versions: &["2", "3"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "vue",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::FileExtension {
            ext: "vue",
            weight: weights::FILE_EXTENSION,
        },
        DetectSignal::ConfigFile {
            name: "vue.config.js",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &[],
    guideline_dir: "vuejs",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "vue",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &["{pm} run build"],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

static ANGULAR: ModuleDef = ModuleDef {
    id: "angular",
    display_name: "Angular",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["angular", "standalone-components", "signals"],
    supported_versions: &["17", "18", "19"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "@angular/core",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "angular.json",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &[],
    guideline_dir: "angular",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "@angular/core",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["ng serve"],
        build: &["ng build"],
        test: &["ng test"],
        lint: &["ng lint"],
        install: &["{pm} install"],
    }),
};

static SVELTE: ModuleDef = ModuleDef {
    id: "svelte",
    display_name: "Svelte",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["svelte", "runes", "stores"],
    supported_versions: &["4", "5"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "svelte",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::DevDependency {
            ecosystem: Ecosystem::Npm,
            name: "svelte",
            weight: weights::DEV_DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "svelte.config.js",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &[],
    guideline_dir: "svelte",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "svelte",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &["{pm} run build"],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

static EXPRESS: ModuleDef = ModuleDef {
    id: "express",
    display_name: "Express",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["express", "middleware", "rest"],
    supported_versions: &["4", "5"],
    signals: &[DetectSignal::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "express",
        weight: weights::DEPENDENCY,
    }],
    excludes: &[],
    guideline_dir: "express",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "express",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["{pm} run dev"],
        build: &[],
        test: &["{pm} test"],
        lint: &["{pm} run lint"],
        install: &["{pm} install"],
    }),
};

static DJANGO: ModuleDef = ModuleDef {
    id: "django",
    display_name: "Django",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["django", "orm", "migrations"],
    supported_versions: &["4", "5"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Python,
            name: "django",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "manage.py",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &[],
    guideline_dir: "django",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Python,
        name: "django",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["python manage.py runserver"],
        build: &[],
        test: &["python manage.py test"],
        lint: &["ruff check ."],
        install: &["pip install -e ."],
    }),
};

static FLASK: ModuleDef = ModuleDef {
    id: "flask",
    display_name: "Flask",
    kind: ModuleKind::Framework,
    priority: PriorityClass::Framework,
    keywords: &["flask", "blueprints", "wsgi"],
    supported_versions: &["2", "3"],
    signals: &[DetectSignal::Dependency {
        ecosystem: Ecosystem::Python,
        name: "flask",
        weight: weights::DEPENDENCY,
    }],
    excludes: &[],
    guideline_dir: "flask",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Python,
        name: "flask",
    },
    granularity: VersionGranularity::Major,
    commands: Some(CommandTemplates {
        dev: &["flask run --debug"],
        build: &[],
        test: &["pytest"],
        lint: &["ruff check ."],
        install: &["pip install -e ."],
    }),
};

// =============================================================================
// CSS frameworks
// =============================================================================

static TAILWIND: ModuleDef = ModuleDef {
    id: "tailwind",
    display_name: "Tailwind CSS",
    kind: ModuleKind::Library,
    priority: PriorityClass::CssFramework,
    keywords: &["tailwind", "utility-css"],
    supported_versions: &["3", "4"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "tailwindcss",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::DevDependency {
            ecosystem: Ecosystem::Npm,
            name: "tailwindcss",
            weight: weights::DEV_DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "tailwind.config.js",
            weight: weights::CONFIG_FILE,
        },
        DetectSignal::ConfigFile {
            name: "tailwind.config.ts",
            weight: weights::CONFIG_FILE,
        },
    ],
    excludes: &[],
    guideline_dir: "tailwind",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "tailwindcss",
    },
    granularity: VersionGranularity::Major,
    commands: None,
};

// =============================================================================
// Languages
// =============================================================================

static TYPESCRIPT: ModuleDef = ModuleDef {
    id: "typescript",
    display_name: "TypeScript",
    kind: ModuleKind::Language,
    priority: PriorityClass::SpecializedLanguage,
    keywords: &["typescript", "types", "strict"],
    supported_versions: &["5"],
    signals: &[
        DetectSignal::Dependency {
            ecosystem: Ecosystem::Npm,
            name: "typescript",
            weight: weights::DEPENDENCY,
        },
        DetectSignal::DevDependency {
            ecosystem: Ecosystem::Npm,
            name: "typescript",
            weight: weights::DEV_DEPENDENCY,
        },
        DetectSignal::ConfigFile {
            name: "tsconfig.json",
            weight: weights::CONFIG_FILE,
        },
        DetectSignal::FileExtension {
            ext: "ts",
            weight: weights::FILE_EXTENSION,
        },
    ],
    excludes: &["javascript"],
    guideline_dir: "typescript",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Npm,
        name: "typescript",
    },
    granularity: VersionGranularity::Major,
    commands: None,
};

static JAVASCRIPT: ModuleDef = ModuleDef {
    id: "javascript",
    display_name: "JavaScript",
    kind: ModuleKind::Language,
    priority: PriorityClass::BaseLanguage,
    keywords: &["javascript", "esm", "node"],
    supported_versions: &[],
    signals: &[
        DetectSignal::Manifest {
            ecosystem: Ecosystem::Npm,
            weight: weights::MANIFEST,
        },
        DetectSignal::FileExtension {
            ext: "js",
            weight: weights::FILE_EXTENSION,
        },
    ],
    excludes: &[],
    guideline_dir: "javascript",
    version_probe: VersionProbe::None,
    granularity: VersionGranularity::Major,
    commands: None,
};

static PYTHON: ModuleDef = ModuleDef {
    id: "python",
    display_name: "Python",
    kind: ModuleKind::Language,
    priority: PriorityClass::BaseLanguage,
    keywords: &["python", "pep8", "typing"],
    supported_versions: &["3"],
    signals: &[
        DetectSignal::Manifest {
            ecosystem: Ecosystem::Python,
            weight: weights::MANIFEST,
        },
        DetectSignal::FileExtension {
            ext: "py",
            weight: weights::FILE_EXTENSION,
        },
    ],
    excludes: &[],
    guideline_dir: "python",
    version_probe: VersionProbe::PythonRequires,
    granularity: VersionGranularity::Major,
    commands: None,
};

static PHP: ModuleDef = ModuleDef {
    id: "php",
    display_name: "PHP",
    kind: ModuleKind::Language,
    priority: PriorityClass::BaseLanguage,
    keywords: &["php", "composer", "psr"],
    supported_versions: &["8.3", "8.4"],
    signals: &[
        DetectSignal::Manifest {
            ecosystem: Ecosystem::Php,
            weight: weights::MANIFEST,
        },
        DetectSignal::FileExtension {
            ext: "php",
            weight: weights::FILE_EXTENSION,
        },
    ],
    excludes: &[],
    guideline_dir: "php",
    version_probe: VersionProbe::Dependency {
        ecosystem: Ecosystem::Php,
        name: "php",
    },
    granularity: VersionGranularity::MajorMinor,
    commands: None,
};

// =============================================================================
// Registration
// =============================================================================

/// Every built-in definition, in no particular order; the catalog imposes
/// the canonical ordering.
pub static BUILTIN: &[&ModuleDef] = &[
    &NEXTJS,
    &NUXT,
    &REACT,
    &VUEJS,
    &ANGULAR,
    &SVELTE,
    &EXPRESS,
    &DJANGO,
    &FLASK,
    &TAILWIND,
    &TYPESCRIPT,
    &JAVASCRIPT,
    &PYTHON,
    &PHP,
];

/// Instantiate every built-in module
pub fn all() -> Vec<SharedModule> {
    BUILTIN
        .iter()
        .map(|def| Arc::new(DeclarativeModule::new(def)) as SharedModule)
        .collect()
}

/// Look up one built-in module by id
pub fn find(id: &str) -> Option<DeclarativeModule> {
    BUILTIN
        .iter()
        .find(|def| def.id == id)
        .map(|def| DeclarativeModule::new(def))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for def in BUILTIN {
            assert!(seen.insert(def.id), "duplicate builtin id: {}", def.id);
        }
    }

    #[test]
    fn test_excludes_reference_known_ids() {
        let ids: BTreeSet<&str> = BUILTIN.iter().map(|def| def.id).collect();
        for def in BUILTIN {
            for excluded in def.excludes {
                assert!(ids.contains(excluded), "{} excludes unknown {}", def.id, excluded);
            }
        }
    }

    #[test]
    fn test_languages_declare_no_commands() {
        for def in BUILTIN {
            if matches!(def.kind, crate::types::ModuleKind::Language) {
                assert!(def.commands.is_none(), "{} is a language with commands", def.id);
            }
        }
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert!(find("react").is_some());
        assert!(find("cobol").is_none());
    }
}
