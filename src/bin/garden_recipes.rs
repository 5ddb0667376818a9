//! Command-line browser and maintenance tool for the recipe data.
//!
//! Browsing commands fall back to an empty catalog when the data cannot be
//! loaded; maintenance commands (`validate`, `sync-*`) fail instead.

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use garden_recipes::assets::{find_recipe_image, sync_data};
use garden_recipes::catalog::Catalog;
use garden_recipes::config::{SiteConfig, DEFAULT_CONFIG_FILE};
use garden_recipes::craving::{CravingMatcher, CravingSearch, SearchStatus};
use garden_recipes::filter::{
    IngredientQuery, IngredientSortKey, RecipeQuery, RecipeSortKey, SortDirection, SortState,
};
use garden_recipes::validate::{sync_missing_ingredients, validate_dir};
use garden_recipes::{best_variant, Category, IngredientType, Rarity, Recipe};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Number of related recipes shown under a recipe.
const RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "garden-recipes",
    about = "Browse, search and maintain Grow a Garden cooking recipes",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Site config file (YAML)
    #[clap(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Data directory, overriding the config file
    #[clap(long, global = true)]
    data_dir: Option<Utf8PathBuf>,

    /// Log level; RUST_LOG takes precedence when set
    #[clap(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Shorthand for --log-level debug
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recipes with search, filters and sorting
    Recipes {
        /// Case-insensitive name search
        #[clap(short, long, default_value = "")]
        search: String,

        #[clap(long = "category")]
        categories: Vec<Category>,

        /// Keep recipes with a variant of this rarity (repeatable)
        #[clap(long = "rarity")]
        rarities: Vec<Rarity>,

        /// Maximum cook time in minutes; the slider maximum means any
        #[clap(long)]
        max_cook_time: Option<f64>,

        /// Ingredient ids you have; enables the makeable filter
        #[clap(long, value_delimiter = ',')]
        have: Option<Vec<String>>,

        /// Only recipes makeable from --have (nothing without it)
        #[clap(long)]
        makeable: bool,

        #[clap(long, default_value = "name")]
        sort: RecipeSortKey,

        #[clap(long)]
        desc: bool,

        /// Print JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// List ingredients with search, filters and sorting
    Ingredients {
        /// Case-insensitive name and alias search
        #[clap(short, long, default_value = "")]
        search: String,

        #[clap(long = "type")]
        types: Vec<IngredientType>,

        #[clap(long = "rarity")]
        rarities: Vec<Rarity>,

        #[clap(long, default_value = "name")]
        sort: IngredientSortKey,

        #[clap(long)]
        desc: bool,

        #[clap(long)]
        json: bool,
    },

    /// Find recipes for what you are craving ("something sweet")
    Crave {
        #[clap(required = true)]
        phrase: Vec<String>,

        /// Skip the searching delay
        #[clap(long)]
        no_delay: bool,
    },

    /// Show one recipe with its variants and related recipes
    Show {
        recipe_id: String,

        /// Variant rarity to feature; defaults to the highest
        #[clap(long)]
        rarity: Option<Rarity>,

        /// Print only the featured variant's ingredient list, for copying
        #[clap(long)]
        copy: bool,
    },

    /// Show an ingredient and the recipes that use it
    Uses { ingredient_id: String },

    /// Show the data changelog, newest first
    Changelog {
        /// Only the latest version
        #[clap(long)]
        latest: bool,
    },

    /// Headline numbers for the catalog
    Stats,

    /// Check the data files for integrity problems
    Validate,

    /// Copy the data JSON files into the public data directory
    SyncData,

    /// Add placeholder entries for ingredients referenced but not defined
    SyncIngredients,
}

fn initialize_tracing(level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level.clone()
    };
    initialize_tracing(&level);

    let mut config = SiteConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!(?config, "effective config");

    match cli.command {
        Command::Recipes {
            search,
            categories,
            rarities,
            max_cook_time,
            have,
            makeable,
            sort,
            desc,
            json,
        } => {
            let catalog = load_for_browsing(&config);
            let mut query = RecipeQuery {
                search,
                sort: SortState::with_direction(sort, direction(desc)),
                ..RecipeQuery::default()
            };
            query.filter.categories = categories.into_iter().collect();
            query.filter.rarities = rarities.into_iter().collect();
            query.filter.max_cook_time = max_cook_time.and_then(|m| config.cook_time_ceiling(m));
            query.filter.only_makeable = makeable;
            query.filter.owned_ingredients = have.map(|ids| ids.into_iter().collect());
            if makeable && query.filter.owned_ingredients.is_none() {
                warn!("--makeable without --have matches nothing");
            }

            let recipes = query.run(&catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            } else {
                print_recipe_table(&recipes);
                println!(
                    "\n{} of {} recipes ({} filter(s) active)",
                    recipes.len(),
                    catalog.recipes().len(),
                    query.filter.active_count()
                );
            }
        }

        Command::Ingredients {
            search,
            types,
            rarities,
            sort,
            desc,
            json,
        } => {
            let catalog = load_for_browsing(&config);
            let mut query = IngredientQuery {
                search,
                sort: SortState::with_direction(sort, direction(desc)),
                ..IngredientQuery::default()
            };
            query.filter.types = types.into_iter().collect();
            query.filter.rarities = rarities.into_iter().collect();

            let ingredients = query.run(&catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&ingredients)?);
            } else {
                for ingredient in &ingredients {
                    println!(
                        "{:<24} {:<10} {:<12} {:>3} recipe(s){}",
                        ingredient.name,
                        ingredient.kind,
                        ingredient.rarity.map(|r| r.to_string()).unwrap_or_default(),
                        catalog.recipe_usage_count(&ingredient.id),
                        if ingredient.is_reharvestable() {
                            "  reharvestable"
                        } else {
                            ""
                        }
                    );
                }
                println!("\n{} of {} ingredients", ingredients.len(), catalog.ingredients().len());
            }
        }

        Command::Crave { phrase, no_delay } => {
            let catalog = load_for_browsing(&config);
            let phrase = phrase.join(" ");
            let delay = if no_delay {
                Duration::ZERO
            } else {
                config.craving_delay()
            };
            let search = CravingSearch::new(CravingMatcher::new(config.thesaurus()), delay);

            let mut status = search.subscribe();
            let spinner = tokio::spawn(async move {
                while status.changed().await.is_ok() {
                    if *status.borrow_and_update() == SearchStatus::Searching {
                        eprintln!("Searching...");
                    }
                }
            });

            let results = search.run(catalog.recipes(), &phrase).await;
            drop(search);
            let _ = spinner.await;

            if results.is_empty() {
                println!("No recipes match \"{phrase}\"");
            } else {
                print_recipe_table(&results);
            }
        }

        Command::Show {
            recipe_id,
            rarity,
            copy,
        } => {
            let catalog = load_for_browsing(&config);
            let Some(recipe) = catalog.recipe(&recipe_id) else {
                bail!("Recipe not found: {recipe_id}");
            };
            let featured = best_variant(recipe, rarity);

            if copy {
                match featured {
                    Some(variant) => println!("{}", catalog.ingredient_list_text(variant)),
                    None => bail!("Recipe {recipe_id} has no matching variant"),
                }
                return Ok(());
            }

            println!("{} ({})", recipe.name, recipe.category);
            if let Some(description) = &recipe.description {
                println!("{description}");
            }
            if !recipe.cravings.is_empty() {
                println!("Cravings: {}", recipe.cravings.join(", "));
            }
            if let Some(image) = find_recipe_image(recipe, &config.images_dir) {
                println!("Image: {image}");
            }

            for variant in &recipe.variants {
                let marker = if featured.is_some_and(|f| std::ptr::eq(f, variant)) {
                    "*"
                } else {
                    " "
                };
                let cook_time = variant
                    .cook_time_minutes
                    .map(|m| format!(", {m} min"))
                    .unwrap_or_default();
                let verified = if variant.is_verified() { ", verified" } else { "" };
                println!("\n{marker} {}{cook_time}{verified}", variant.rarity);
                for slot in catalog.resolve_ingredients(variant) {
                    let missing = if slot.is_missing() { " (unknown)" } else { "" };
                    println!("    {}× {}{missing}", slot.qty, slot.display_name());
                }
                for note in &variant.notes {
                    println!("    note: {note}");
                }
            }

            let related = catalog.related_recipes(recipe, RELATED_LIMIT);
            if !related.is_empty() {
                println!("\nRelated:");
                for other in related {
                    println!("  {} ({})", other.name, other.id);
                }
            }
        }

        Command::Uses { ingredient_id } => {
            let catalog = load_for_browsing(&config);
            let ingredient = catalog
                .require_ingredient(&ingredient_id)
                .with_context(|| format!("No ingredient {ingredient_id} in {}", config.data_dir))?;
            println!(
                "{} ({}, {})",
                ingredient.name,
                ingredient.kind,
                ingredient
                    .rarity
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "no rarity".to_string())
            );
            for note in &ingredient.notes {
                println!("  note: {note}");
            }
            let recipes = catalog.recipes_using_ingredient(&ingredient_id);
            println!("\nUsed by {} recipe(s):", recipes.len());
            print_recipe_table(&recipes);
        }

        Command::Changelog { latest } => {
            let catalog = load_for_browsing(&config);
            if catalog.versions().is_empty() {
                println!("No data loaded");
                return Ok(());
            }
            let versions: Vec<_> = if latest {
                catalog.latest_version().into_iter().collect()
            } else {
                catalog.versions().iter().rev().collect()
            };
            for version in versions {
                let date = version
                    .parsed_date()
                    .map(|d| d.format("%B %-d, %Y").to_string())
                    .unwrap_or_else(|| version.date.clone());
                println!("v{} ({date})", version.version);
                for note in &version.notes {
                    println!("  - {note}");
                }
            }
        }

        Command::Stats => {
            let catalog = load_for_browsing(&config);
            let stats = catalog.stats();
            println!("Recipes:              {}", stats.recipe_count);
            println!("Variants:             {}", stats.variant_count);
            println!("Categories:           {}", stats.category_count);
            println!("Ingredients:          {}", stats.ingredient_count);
            println!("Reharvestable:        {}", stats.reharvestable_count);
            println!("Verified recipes:     {}", stats.verified_recipe_count);
            println!("Avg. ingredients:     {}", stats.avg_ingredients);
            if let Some(version) = catalog.latest_version() {
                println!("Data version:         {}", version.version);
            }
        }

        Command::Validate => {
            let report = validate_dir(&config.data_dir)
                .with_context(|| format!("Failed to read data from {}", config.data_dir))?;
            print!("{report}");
            if !report.is_ok() {
                bail!("Validation failed with {} error(s)", report.errors().count());
            }
            println!("\nData validation passed");
            if report.is_empty_data() {
                println!("No data loaded yet");
            }
        }

        Command::SyncData => {
            let copied = sync_data(&config.data_dir, &config.public_data_dir)
                .context("Failed to sync data files")?;
            for path in &copied {
                println!("{path}");
            }
        }

        Command::SyncIngredients => {
            let added = sync_missing_ingredients(&config.data_dir)
                .context("Failed to sync ingredients")?;
            if added.is_empty() {
                println!("No missing ingredients");
            } else {
                println!("Added {} placeholder ingredient(s):", added.len());
                for ingredient in &added {
                    println!(
                        "  {} (id: {}) defaults: {}/{}",
                        ingredient.name,
                        ingredient.id,
                        ingredient.kind,
                        ingredient.rarity.map(|r| r.to_string()).unwrap_or_default()
                    );
                }
                println!("Review their type and rarity by hand.");
            }
        }
    }

    Ok(())
}

fn load_for_browsing(config: &SiteConfig) -> Catalog {
    let catalog = Catalog::load_or_empty(&config.data_dir);
    if catalog.is_empty() {
        eprintln!("No data loaded from {}", config.data_dir);
    } else {
        info!(
            recipes = catalog.recipes().len(),
            ingredients = catalog.ingredients().len(),
            "catalog ready"
        );
    }
    catalog
}

fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

fn print_recipe_table(recipes: &[&Recipe]) {
    for recipe in recipes {
        let top = recipe
            .variants
            .iter()
            .map(|v| v.rarity)
            .max()
            .map(|r| r.to_string())
            .unwrap_or_default();
        println!(
            "{:<20} {:<28} {:<10} {:<12} {} variant(s)",
            recipe.id,
            recipe.name,
            recipe.category,
            top,
            recipe.variants.len()
        );
    }
}
