use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use inkwell_core::health::{healthz, readyz};
use inkwell_core::middleware::request_id_layer;

use crate::handlers::{
    auth::{
        create_verification_token, get_account_user, get_session, link_account, list_accounts,
        purge_expired, sign_in, sign_out, unlink_account,
    },
    follow::{follow_many, follow_user, get_followers, get_following, unfollow_user},
    ink::{
        compose_ink, delete_ink, get_author_inks, get_feed, get_ink, get_my_ink_stats,
        get_trending, pin_ink, record_view, unpin_ink, update_ink,
    },
    onboarding::{advance_onboarding_step, complete_onboarding, get_onboarding, put_onboarding},
    reaction::{get_reactions, get_reactors, set_reaction, unset_reaction},
    settings::{get_settings, patch_settings, put_settings},
    user::{delete_me, get_me, get_profile, get_suggestions, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/verification-tokens", post(create_verification_token))
        .route("/auth/sessions", post(sign_in))
        .route("/auth/sessions/{token}", get(get_session))
        .route("/auth/sessions/{token}", delete(sign_out))
        .route("/auth/accounts", post(link_account))
        .route("/auth/accounts", get(list_accounts))
        .route(
            "/auth/accounts/{provider}/{provider_account_id}",
            get(get_account_user),
        )
        .route(
            "/auth/accounts/{provider}/{provider_account_id}",
            delete(unlink_account),
        )
        .route("/auth/purge-expired", post(purge_expired))
        // Users
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/@me", delete(delete_me))
        .route("/users/@me/suggestions", get(get_suggestions))
        .route("/users/{username}", get(get_profile))
        .route("/users/{username}/inks", get(get_author_inks))
        // Inks
        .route("/inks", post(compose_ink))
        .route("/inks", get(get_feed))
        .route("/inks/trending", get(get_trending))
        .route("/inks/{id}", get(get_ink))
        .route("/inks/{id}", patch(update_ink))
        .route("/inks/{id}", delete(delete_ink))
        .route("/inks/{id}/views", post(record_view))
        .route("/inks/{id}/pin", put(pin_ink))
        .route("/inks/{id}/pin", delete(unpin_ink))
        .route("/users/@me/inks/stats", get(get_my_ink_stats))
        // Reactions
        .route("/inks/{id}/reactions", get(get_reactions))
        .route("/inks/{id}/reactions/{kind}", put(set_reaction))
        .route("/inks/{id}/reactions/{kind}", delete(unset_reaction))
        .route("/inks/{id}/reactors", get(get_reactors))
        // Follows
        .route("/users/@me/follows", post(follow_user))
        .route("/users/@me/follows", get(get_following))
        .route("/users/@me/follows/batch", post(follow_many))
        .route("/users/@me/follows/{user_id}", delete(unfollow_user))
        .route("/users/@me/followers", get(get_followers))
        // Notification settings
        .route("/users/@me/notification-settings", get(get_settings))
        .route("/users/@me/notification-settings", put(put_settings))
        .route("/users/@me/notification-settings", patch(patch_settings))
        // Onboarding
        .route("/users/@me/onboarding", get(get_onboarding))
        .route("/users/@me/onboarding", put(put_onboarding))
        .route("/users/@me/onboarding/step", post(advance_onboarding_step))
        .route("/users/@me/onboarding/complete", post(complete_onboarding))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
