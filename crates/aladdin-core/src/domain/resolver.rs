//! Default resolution.
//!
//! Fills every field a descriptor left out, according to its image mode.
//! Explicit values always pass through untouched; derived defaults (group,
//! home) follow the *effective* user name, whether it was given or defaulted.

use crate::domain::{
    entities::{
        descriptor::{ComponentDescriptor, ImageSpec, LanguageSpec},
        resolved::{
            ResolvedComponentConfig, ResolvedImage, ResolvedImageConfig, ResolvedLanguage,
            ResolvedUser, ResolvedWorkdir,
        },
    },
    value_objects::BuildMode,
};

/// User created in standard images unless the descriptor names another.
pub const DEFAULT_USER: &str = "aladdin-user";

/// Working directory of standard images.
pub const DEFAULT_WORKDIR: &str = "/code";

/// Apply mode-specific defaults to a validated descriptor.
///
/// Total over valid descriptors. `mode` only affects the `user.sudo` default
/// of standard images: development images grant sudo, production ones do not.
pub fn resolve(descriptor: &ComponentDescriptor, mode: BuildMode) -> ResolvedComponentConfig {
    let language = match descriptor.image {
        ImageSpec::Traditional => None,
        _ => descriptor.language.as_ref().map(resolve_language),
    };

    let image = match &descriptor.image {
        ImageSpec::Standard(image) => {
            let name = image
                .user
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_USER.to_string());
            ResolvedImage::Standard(ResolvedImageConfig {
                packages: image.packages.clone().unwrap_or_default(),
                user: ResolvedUser {
                    create: image.user.create.unwrap_or(true),
                    group: image.user.group.clone().unwrap_or_else(|| name.clone()),
                    home: image.user.home.clone().unwrap_or_else(|| home_of(&name)),
                    sudo: image.user.sudo.unwrap_or(mode.is_development()),
                    name,
                },
                workdir: ResolvedWorkdir {
                    create: image.workdir.create.unwrap_or(true),
                    path: image
                        .workdir
                        .path
                        .clone()
                        .unwrap_or_else(|| DEFAULT_WORKDIR.to_string()),
                },
            })
        }
        ImageSpec::Compatible(image) => {
            let name = image.user.name.clone();
            ResolvedImage::Compatible {
                base: image.base.clone(),
                config: ResolvedImageConfig {
                    packages: image.packages.clone().unwrap_or_default(),
                    user: ResolvedUser {
                        create: image.user.create.unwrap_or(false),
                        group: image.user.group.clone().unwrap_or_else(|| name.clone()),
                        home: image.user.home.clone().unwrap_or_else(|| home_of(&name)),
                        sudo: image.user.sudo.unwrap_or(false),
                        name,
                    },
                    workdir: ResolvedWorkdir {
                        create: image.workdir.create.unwrap_or(false),
                        path: image.workdir.path.clone(),
                    },
                },
            }
        }
        ImageSpec::Traditional => ResolvedImage::Traditional,
    };

    ResolvedComponentConfig {
        name: descriptor.name.clone(),
        language,
        image,
        dependencies: descriptor.dependencies.clone(),
    }
}

fn resolve_language(language: &LanguageSpec) -> ResolvedLanguage {
    ResolvedLanguage {
        name: language.name,
        version: language
            .version
            .clone()
            .unwrap_or_else(|| language.name.default_version().to_string()),
        interpreter: language
            .spec
            .interpreter
            .clone()
            .unwrap_or_else(|| language.name.default_interpreter().to_string()),
    }
}

fn home_of(user: &str) -> String {
    format!("/home/{user}")
}
