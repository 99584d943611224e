// src/web/routes.rs
use crate::{
    models::{
        academico::{Curso, Ementa, Turma},
        pessoa::{Aluno, Coordenador, Instrutor, Interessado},
    },
    state::AppState,
    web::{
        admin_handlers, auth_handlers, coordenacao_handlers, crud, diario_handlers, mw_auth, mw_role,
        painel_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::permanent("/painel") }));

    // --- Páginas HTML autenticadas ---
    let page_routes = Router::new()
        .route("/painel", get(painel_handlers::painel_page_handler))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), mw_auth::require_auth));

    // --- Administração (apenas admin) ---
    let admin_routes = Router::new()
        .route("/users", get(admin_handlers::listar_users).post(admin_handlers::criar_user))
        .route(
            "/users/{id}",
            get(admin_handlers::obter_user)
                .put(admin_handlers::atualizar_user)
                .delete(admin_handlers::excluir_user),
        )
        .route(
            "/coordenadores",
            get(crud::listar::<Coordenador>).post(admin_handlers::criar_coordenador),
        )
        .route(
            "/coordenadores/{id}",
            get(crud::obter::<Coordenador>)
                .put(admin_handlers::atualizar_coordenador)
                .delete(crud::excluir::<Coordenador>),
        )
        .route("/instrutores", get(crud::listar::<Instrutor>).post(admin_handlers::criar_instrutor))
        .route(
            "/instrutores/{id}",
            get(crud::obter::<Instrutor>)
                .put(admin_handlers::atualizar_instrutor)
                .delete(crud::excluir::<Instrutor>),
        )
        .route("/desfazer", post(admin_handlers::desfazer))
        .route_layer(middleware::from_fn(mw_role::require_admin));

    // --- Coordenação (admin ou coordenador) ---
    let coordenacao_routes = Router::new()
        .route("/cursos", get(crud::listar::<Curso>).post(coordenacao_handlers::criar_curso))
        .route(
            "/cursos/{id}",
            get(crud::obter::<Curso>)
                .put(coordenacao_handlers::atualizar_curso)
                .delete(crud::excluir::<Curso>),
        )
        .route("/ementas", get(crud::listar::<Ementa>).post(coordenacao_handlers::criar_ementa))
        .route(
            "/ementas/{id}",
            get(crud::obter::<Ementa>)
                .put(coordenacao_handlers::atualizar_ementa)
                .delete(crud::excluir::<Ementa>),
        )
        .route("/turmas", get(crud::listar::<Turma>).post(coordenacao_handlers::criar_turma))
        .route(
            "/turmas/{id}",
            get(crud::obter::<Turma>)
                .put(coordenacao_handlers::atualizar_turma)
                .delete(crud::excluir::<Turma>),
        )
        .route(
            "/interessados",
            get(crud::listar::<Interessado>).post(coordenacao_handlers::criar_interessado),
        )
        .route("/interessados/matricula", post(coordenacao_handlers::matricular))
        .route(
            "/interessados/{id}",
            get(crud::obter::<Interessado>)
                .put(coordenacao_handlers::atualizar_interessado)
                .delete(crud::excluir::<Interessado>),
        )
        .route("/interessados/{id}/converter", post(coordenacao_handlers::converter_interessado))
        .route("/alunos", get(coordenacao_handlers::listar_alunos))
        .route(
            "/alunos/{id}",
            get(crud::obter::<Aluno>).put(coordenacao_handlers::atualizar_aluno),
        )
        .route_layer(middleware::from_fn(mw_role::require_coordenacao));

    // --- Diários (todos os papéis; instrutores limitados às suas turmas) ---
    let diario_routes = Router::new()
        .route("/", post(diario_handlers::criar_diario))
        .route(
            "/{id}",
            get(diario_handlers::obter_diario)
                .put(diario_handlers::atualizar_diario)
                .delete(diario_handlers::excluir_diario),
        )
        .route("/turmas/{turma_id}", get(diario_handlers::resumo_turma))
        .route("/turmas/{turma_id}/formulario", get(diario_handlers::formulario))
        .route_layer(middleware::from_fn(mw_role::require_diarios));

    // --- API JSON autenticada ---
    let api_routes = Router::new()
        .route("/me", get(painel_handlers::me))
        .route("/painel", get(painel_handlers::painel_json))
        .nest("/admin", admin_routes)
        .nest("/coordenacao", coordenacao_routes)
        .nest("/diarios", diario_routes)
        .route_layer(middleware::from_fn_with_state(app_state.clone(), mw_auth::require_api_auth));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(page_routes)
        .nest("/api", api_routes)
        .with_state(app_state)
}
