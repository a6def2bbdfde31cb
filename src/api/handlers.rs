use axum::{
    Form, Router,
    extract::{Path, Query},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower::Layer;
use tracing::{debug, info};

use crate::{
    api::{
        extractors::Users,
        middleware::{method_override, session_middleware},
        models::*,
        state::AppState,
        templates::{EditUserTemplate, IndexTemplate, NewUserTemplate, ShowTemplate, UserFields, render},
    },
    core::{
        errors::{AppError, ValidationErrors},
        models::{NewUser, User, UserChanges},
        validator::validate,
    },
    infrastructure::{
        session::{
            Session,
            flash::{Flash, FlashLevel},
        },
        storage::UserStore,
    },
};

pub const INDEX_PATH: &str = "/users";

pub const USER_CREATED: &str = "User successfully created";
pub const USER_UPDATED: &str = "User successfully updated";
pub const USER_DELETED: &str = "User successfully deleted";
pub const CREATE_FAILED: &str = "Something went wrong";

// Define routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", get(index).post(create))
        .route("/users/new", get(new_form))
        .route("/users/show/{id}", get(show))
        .route("/users/{id}/edit", get(edit_form))
        .route(
            "/users/{id}",
            axum::routing::patch(update).put(update).delete(destroy),
        )
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .with_state(state)
}

/// The full application. Method override sits in front of the router so
/// form posts are routed on their overridden method.
pub fn app(state: AppState) -> Router {
    Router::new().fallback_service(middleware::from_fn(method_override).layer(routes(state)))
}

async fn index(
    session: Session,
    Users(users): Users,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, ApiError> {
    let term = query.name;
    let matching: Vec<User> = users
        .all()
        .await?
        .into_iter()
        .filter(|u| u.name.contains(term.as_str()))
        .collect();
    let messages = session.take_flash().await?;
    debug!(term = %term, matched = matching.len(), "Listing users");
    render(&IndexTemplate {
        term,
        users: matching,
        messages,
    })
}

async fn show(Users(users): Users, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let user = users.find(&id).await?;
    render(&ShowTemplate { user })
}

async fn new_form() -> Result<Html<String>, ApiError> {
    render(&NewUserTemplate {
        user: UserFields::default(),
        errors: ValidationErrors::new(),
        messages: Flash::default(),
    })
}

async fn create(
    session: Session,
    Users(mut users): Users,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, ApiError> {
    let new_user = NewUser::from(form);
    let errors = validate(&new_user);

    if errors.is_empty() {
        session.flash(FlashLevel::Success, USER_CREATED).await?;
        let user = users.create(new_user).await?;
        info!(user_id = %user.id, name = %user.name, "User created");
        return redirect_to_index(&*users);
    }

    info!(fields = ?errors.fields(), "Rejected new user");
    // The failure notice is for the next page; this one shows what was pending.
    let messages = session.take_flash().await?;
    session.flash(FlashLevel::Errors, CREATE_FAILED).await?;
    let page = render(&NewUserTemplate {
        user: UserFields {
            name: new_user.name,
            email: new_user.email,
        },
        errors,
        messages,
    })?;
    Ok(page.into_response())
}

async fn edit_form(Users(users): Users, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let user = users.find(&id).await?;
    render(&EditUserTemplate {
        id: user.id.clone(),
        user: UserFields::from(&user),
        errors: ValidationErrors::new(),
        messages: Flash::default(),
    })
}

async fn update(
    session: Session,
    Users(mut users): Users,
    Path(id): Path<String>,
    Form(form): Form<UpdateUserForm>,
) -> Result<Response, ApiError> {
    let changes = UserChanges::from(form);
    let existing = users.find(&id).await?;
    let mut edited = existing.clone();
    edited.apply(changes.clone());
    let errors = validate(&edited);

    if errors.is_empty() {
        session.flash(FlashLevel::Success, USER_UPDATED).await?;
        let user = users.update(&id, changes).await?;
        info!(user_id = %user.id, name = %user.name, "User updated");
        return redirect_to_index(&*users);
    }

    info!(user_id = %id, fields = ?errors.fields(), "Rejected user update");
    let page = render(&EditUserTemplate {
        id,
        user: UserFields::from(&existing),
        errors,
        messages: Flash::default(),
    })?;
    Ok(page.into_response())
}

async fn destroy(
    session: Session,
    Users(mut users): Users,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    session.flash(FlashLevel::Success, USER_DELETED).await?;
    users.delete(&id).await?;
    info!(user_id = %id, "User deleted");
    redirect_to_index(&*users)
}

/// 302 to the list page, handing back whatever the store needs persisted
/// client-side.
fn redirect_to_index(users: &dyn UserStore) -> Result<Response, ApiError> {
    let mut response = (StatusCode::FOUND, [(header::LOCATION, INDEX_PATH)]).into_response();
    if let Some(cookie) = users.response_cookie() {
        let value = HeaderValue::from_str(&cookie).map_err(|e| AppError::Storage(e.to_string()))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(response)
}
