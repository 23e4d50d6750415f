use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CallerId;
use crate::models::{
    Ingredient, IngredientLine, MeasurementSystem, Privacy, Recipe, Step, UnitDefinition,
    UserProfile,
};
use crate::services::{filter, sample, ConvertedLine, FilterCriteria};

use super::{AppState, AppStateInner};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct IngredientLineRequest {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_privacy")]
    pub privacy: Privacy,
    #[serde(default = "default_servings")]
    pub servings: u32,
    pub author: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineRequest>,
    #[serde(default)]
    pub steps: Vec<String>,
}

fn default_privacy() -> Privacy {
    Privacy::Private
}

fn default_servings() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
    pub servings: u32,
    pub author: String,
    pub ingredients: Vec<ConvertedLine>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct SystemQuery {
    pub system: Option<MeasurementSystem>,
}

#[derive(Debug, Deserialize)]
pub struct UnitsQuery {
    pub system: MeasurementSystem,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub value: u8,
}

#[derive(Debug, Serialize)]
pub struct RatingSummaryResponse {
    pub average: Option<f64>,
    pub user_rating: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileBody {
    pub preferred_system: MeasurementSystem,
}

/// Builds a recipe response, converting ingredient lines to the target
/// system when one is requested. Lines that cannot be converted keep
/// their source quantity and unit with `converted: false`.
fn recipe_response(
    inner: &AppStateInner,
    recipe: &Recipe,
    system: Option<MeasurementSystem>,
) -> RecipeResponse {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|line| match system {
            Some(system) => {
                let category = inner.ingredients.category_of(&line.ingredient);
                inner.units.convert_line(line, system, category)
            }
            None => ConvertedLine {
                ingredient: line.ingredient.clone(),
                quantity: line.quantity,
                unit: line.unit.clone(),
                converted: false,
            },
        })
        .collect();

    RecipeResponse {
        id: recipe.id,
        title: recipe.title.clone(),
        description: recipe.description.clone(),
        privacy: recipe.privacy,
        servings: recipe.servings,
        author: recipe.author.clone(),
        ingredients,
        steps: recipe.steps.clone(),
    }
}

/// Target system for a request: the explicit query parameter wins,
/// otherwise the caller's profile default, otherwise no conversion
fn target_system(
    inner: &AppStateInner,
    caller: CallerId,
    query: Option<MeasurementSystem>,
) -> Option<MeasurementSystem> {
    query.or_else(|| {
        caller
            .0
            .and_then(|user| inner.profiles.get(&user))
            .map(|p| p.preferred_system)
    })
}

fn validate_recipe_request(request: &RecipeRequest) -> AppResult<()> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }
    if request.servings == 0 {
        return Err(AppError::InvalidInput("servings must be positive".to_string()));
    }
    for line in &request.ingredients {
        if line.name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "ingredient name must not be empty".to_string(),
            ));
        }
        if !(line.quantity > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "quantity for '{}' must be positive",
                line.name
            )));
        }
    }
    Ok(())
}

/// Resolves request lines against the ingredient index, creating
/// unknown names on the fly
fn resolve_lines(
    inner: &mut AppStateInner,
    lines: &[IngredientLineRequest],
) -> Vec<IngredientLine> {
    lines
        .iter()
        .map(|line| {
            let ingredient = inner.ingredients.resolve_or_create(&line.name);
            IngredientLine {
                ingredient: ingredient.name,
                quantity: line.quantity,
                unit: line.unit.trim().to_string(),
            }
        })
        .collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Create a new recipe owned by the caller
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Json(request): Json<RecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let owner = caller.required()?;
    validate_recipe_request(&request)?;

    let mut inner = state.inner.write().await;
    let mut recipe = Recipe::new(
        request.title.trim().to_string(),
        request.description,
        request.privacy,
        request.servings,
        owner,
        request.author,
    );
    recipe.ingredients = resolve_lines(&mut inner, &request.ingredients);
    recipe.set_steps(request.steps);

    let response = recipe_response(&inner, &recipe, None);
    tracing::info!(recipe_id = %recipe.id, %owner, "recipe created");
    inner.recipes.insert(recipe.id, recipe);

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the caller's own recipes
pub async fn list_my_recipes(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let owner = caller.required()?;
    let inner = state.inner.read().await;
    let mut own: Vec<&Recipe> = inner
        .recipes
        .values()
        .filter(|r| r.owner == owner)
        .collect();
    own.sort_by_key(|r| r.id);
    let responses = own
        .into_iter()
        .map(|r| recipe_response(&inner, r, None))
        .collect();
    Ok(Json(responses))
}

/// List all public recipes
pub async fn list_public_recipes(
    State(state): State<AppState>,
) -> Json<Vec<RecipeResponse>> {
    let inner = state.inner.read().await;
    let mut public: Vec<&Recipe> = inner
        .recipes
        .values()
        .filter(|r| r.privacy == Privacy::Public)
        .collect();
    public.sort_by_key(|r| r.id);
    let responses = public
        .into_iter()
        .map(|r| recipe_response(&inner, r, None))
        .collect();
    Json(responses)
}

/// Recipe detail, with ingredient lines converted to the requested
/// measurement system
pub async fn get_recipe(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
    Query(query): Query<SystemQuery>,
) -> AppResult<Json<RecipeResponse>> {
    let inner = state.inner.read().await;
    let recipe = inner
        .recipes
        .get(&id)
        .filter(|r| r.visible_to(caller.0))
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;

    let system = target_system(&inner, caller, query.system);
    Ok(Json(recipe_response(&inner, recipe, system)))
}

/// Full update of a recipe; owner only
pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecipeRequest>,
) -> AppResult<Json<RecipeResponse>> {
    let owner = caller.required()?;
    validate_recipe_request(&request)?;

    let mut inner = state.inner.write().await;
    // Existence of another user's recipe is not revealed
    match inner.recipes.get(&id) {
        Some(recipe) if recipe.owner == owner => {}
        _ => return Err(AppError::NotFound(format!("recipe {id}"))),
    }

    let lines = resolve_lines(&mut inner, &request.ingredients);
    let recipe = inner
        .recipes
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;
    recipe.title = request.title.trim().to_string();
    recipe.description = request.description;
    recipe.privacy = request.privacy;
    recipe.servings = request.servings;
    recipe.ingredients = lines;
    recipe.set_steps(request.steps);
    recipe.updated_at = Utc::now();

    let response = recipe_response(&inner, &inner.recipes[&id], None);
    Ok(Json(response))
}

/// Delete a recipe; cascades its steps, ingredient lines, and ratings
pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let owner = caller.required()?;
    let mut inner = state.inner.write().await;
    match inner.recipes.get(&id) {
        Some(recipe) if recipe.owner == owner => {}
        _ => return Err(AppError::NotFound(format!("recipe {id}"))),
    }
    inner.recipes.remove(&id);
    inner.ratings.remove_recipe(id);
    tracing::info!(recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Ranked recipe recommendations, optionally sampled ("surprise me")
/// when `num_choices` is present
pub async fn recommend(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Query(query): Query<SystemQuery>,
    Json(criteria): Json<FilterCriteria>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let inner = state.inner.read().await;
    let pool: Vec<Recipe> = inner.recipes.values().cloned().collect();

    let ranked = filter(&pool, caller.0, &criteria);
    let picked = match criteria.num_choices {
        Some(n) => sample(&ranked, n),
        None => ranked,
    };
    tracing::info!(
        pool = pool.len(),
        results = picked.len(),
        sampled = criteria.num_choices.is_some(),
        "recommendation served"
    );

    let system = target_system(&inner, caller, query.system);
    let responses = picked
        .iter()
        .map(|r| recipe_response(&inner, r, system))
        .collect();
    Ok(Json(responses))
}

/// Average rating and the caller's own rating for a recipe
pub async fn get_rating(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RatingSummaryResponse>> {
    let inner = state.inner.read().await;
    if !inner.recipes.get(&id).is_some_and(|r| r.visible_to(caller.0)) {
        return Err(AppError::NotFound(format!("recipe {id}")));
    }
    Ok(Json(RatingSummaryResponse {
        average: inner.ratings.average(id),
        user_rating: caller.0.and_then(|user| inner.ratings.get(id, user)),
    }))
}

/// Submit or replace the caller's rating of a recipe
pub async fn submit_rating(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
    Json(request): Json<RatingRequest>,
) -> AppResult<Json<RatingSummaryResponse>> {
    let user = caller.required()?;
    let mut inner = state.inner.write().await;
    let recipe = inner
        .recipes
        .get(&id)
        .filter(|r| r.visible_to(Some(user)))
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;
    if recipe.owner == user {
        return Err(AppError::InvalidInput(
            "recipe owners cannot rate their own recipe".to_string(),
        ));
    }

    inner.ratings.submit(id, user, request.value)?;
    Ok(Json(RatingSummaryResponse {
        average: inner.ratings.average(id),
        user_rating: inner.ratings.get(id, user),
    }))
}

/// Ingredient name suggestions for selection controls
pub async fn autocomplete_ingredients(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Json<Vec<Ingredient>> {
    let inner = state.inner.read().await;
    Json(inner.ingredients.autocomplete(&query.q))
}

/// Units available in a measurement system, ordered for display
pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<UnitsQuery>,
) -> Json<Vec<UnitDefinition>> {
    let inner = state.inner.read().await;
    Json(inner.units.units_for_system(query.system))
}

/// The caller's preferred measurement system
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
) -> AppResult<Json<ProfileBody>> {
    let user = caller.required()?;
    let inner = state.inner.read().await;
    let preferred_system = inner
        .profiles
        .get(&user)
        .map(|p| p.preferred_system)
        .unwrap_or(MeasurementSystem::Metric);
    Ok(Json(ProfileBody { preferred_system }))
}

/// Update the caller's preferred measurement system
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Json(body): Json<ProfileBody>,
) -> AppResult<Json<ProfileBody>> {
    let user = caller.required()?;
    let mut inner = state.inner.write().await;
    let profile = inner
        .profiles
        .entry(user)
        .or_insert_with(|| UserProfile::new(user));
    profile.preferred_system = body.preferred_system;
    Ok(Json(ProfileBody {
        preferred_system: body.preferred_system,
    }))
}
