//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::menu::Category;
use crate::profile::ProfileData;

/// Launch command arguments.
#[derive(Debug, Args)]
pub struct LaunchCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Menu command arguments.
#[derive(Debug, Args)]
pub struct MenuCommand {
    /// Only show dishes whose name contains this text (case-sensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show these categories (repeatable)
    #[arg(long = "category", value_enum)]
    pub categories: Vec<CategoryArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl MenuCommand {
    /// Whether a search or filter was requested.
    #[must_use]
    pub fn is_narrowed(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.is_empty()) || !self.categories.is_empty()
    }

    /// The requested categories.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.categories.iter().copied().map(Category::from).collect()
    }
}

/// Onboarding command arguments.
#[derive(Debug, Args)]
pub struct OnboardCommand {
    /// First name (letters only)
    #[arg(long)]
    pub first_name: String,

    /// Email address
    #[arg(long)]
    pub email: String,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the stored profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Edit profile fields and save the record
    Update(ProfileUpdate),
}

/// Profile fields to change. Omitted fields keep their stored value.
#[derive(Debug, Default, Args)]
pub struct ProfileUpdate {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Ten-digit phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Profile image reference; pass an empty string to clear it
    #[arg(long)]
    pub image: Option<String>,

    /// Order status notifications
    #[arg(long, value_name = "BOOL")]
    pub order_status: Option<bool>,

    /// Password change notifications
    #[arg(long, value_name = "BOOL")]
    pub password_changes: Option<bool>,

    /// Special offer notifications
    #[arg(long, value_name = "BOOL")]
    pub special_offers: Option<bool>,

    /// Newsletter subscription
    #[arg(long, value_name = "BOOL")]
    pub newsletter: Option<bool>,
}

impl ProfileUpdate {
    /// Apply the requested edits to `profile`.
    pub fn apply(&self, profile: &mut ProfileData) {
        fn edit(field: &mut String, value: Option<&String>) {
            if let Some(value) = value {
                value.trim().clone_into(field);
            }
        }

        edit(&mut profile.first_name, self.first_name.as_ref());
        edit(&mut profile.last_name, self.last_name.as_ref());
        edit(&mut profile.profile_email, self.email.as_ref());
        edit(&mut profile.phone_number, self.phone.as_ref());

        if let Some(image) = &self.image {
            profile.profile_image = (!image.is_empty()).then(|| image.clone());
        }
        if let Some(on) = self.order_status {
            profile.order_status = on;
        }
        if let Some(on) = self.password_changes {
            profile.password_changes = on;
        }
        if let Some(on) = self.special_offers {
            profile.special_offers = on;
        }
        if let Some(on) = self.newsletter {
            profile.news_letters = on;
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        file: Option<PathBuf>,
    },
}

/// Category argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Starters
    Starters,
    /// Mains
    Mains,
    /// Desserts
    Desserts,
    /// Drinks
    Drinks,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Starters => Self::Starters,
            CategoryArg::Mains => Self::Mains,
            CategoryArg::Desserts => Self::Desserts,
            CategoryArg::Drinks => Self::Drinks,
        }
    }
}
