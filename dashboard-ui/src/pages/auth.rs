//! Login and Register Pages

use leptos::*;
use leptos_router::*;

use energy_monitor::auth::gate::{guest_redirect, DASHBOARD_ROUTE, LOGIN_ROUTE, REGISTER_ROUTE};
use energy_monitor::auth::{RegisterForm, ValidationError};
use energy_monitor::models::LoginRequest;

use crate::state::{use_auth, AuthStore};

/// Redirect away from guest pages once signed in
fn bounce_signed_in(auth: AuthStore) {
    let navigate = use_navigate();
    create_effect(move |_| {
        if let Some(path) = auth.state.with(guest_redirect) {
            navigate(path, Default::default());
        }
    });
}

/// Banner for the last auth failure, dismissable
#[component]
fn ErrorBanner() -> impl IntoView {
    let auth = use_auth();

    move || {
        auth.state
            .with(|s| s.error().map(str::to_string))
            .map(|message| {
                view! {
                    <div class="flex justify-between items-start bg-red-50 border border-red-200 text-red-700 rounded-lg px-4 py-3 text-sm">
                        <span>{message}</span>
                        <button class="ml-4 font-bold" on:click=move |_| auth.clear_error()>"×"</button>
                    </div>
                }
            })
    }
}

#[component]
fn TextInput(
    label: &'static str,
    #[prop(default = "text")]
    kind: &'static str,
    value: RwSignal<String>,
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="text-sm font-medium text-gray-700">{label}</span>
            <input
                type=kind
                required=true
                class="mt-1 w-full rounded-lg border border-gray-300 px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {move || {
                error
                    .and_then(|e| e.get())
                    .map(|e| view! { <span class="text-xs text-red-600">{e}</span> })
            }}
        </label>
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    bounce_signed_in(auth);

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let navigate = use_navigate();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let req = LoginRequest {
            email: email.get(),
            password: password.get(),
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            if auth.login(req).await {
                navigate(DASHBOARD_ROUTE, Default::default());
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-100">
            <form class="bg-white shadow rounded-xl p-8 w-full max-w-md space-y-4" on:submit=on_submit>
                <h1 class="text-2xl font-bold text-center">"Iniciar sesión"</h1>
                <ErrorBanner />
                <TextInput label="Correo electrónico" kind="email" value=email />
                <TextInput label="Contraseña" kind="password" value=password />
                <button
                    type="submit"
                    class="w-full py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium disabled:opacity-50"
                    disabled=move || auth.state.with(|s| s.is_loading())
                >
                    "Entrar"
                </button>
                <p class="text-sm text-center text-gray-500">
                    "¿No tienes cuenta? "
                    <A href=REGISTER_ROUTE class="text-blue-600 hover:underline">"Regístrate"</A>
                </p>
            </form>
        </div>
    }
}

#[component]
pub fn Register() -> impl IntoView {
    let auth = use_auth();
    bounce_signed_in(auth);

    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirm_password = create_rw_signal(String::new());
    let errors = create_rw_signal(Vec::<ValidationError>::new());
    let navigate = use_navigate();

    let field_error = move |field: &'static str| {
        Signal::derive(move || {
            errors.with(|errs| {
                errs.iter()
                    .find(|e| e.field() == field)
                    .map(|e| e.to_string())
            })
        })
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            first_name: first_name.get(),
            last_name: last_name.get(),
            email: email.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
        };
        let req = match form.validate() {
            Ok(req) => {
                errors.set(Vec::new());
                req
            }
            Err(errs) => {
                errors.set(errs);
                return;
            }
        };

        let navigate = navigate.clone();
        spawn_local(async move {
            if auth.register(req).await {
                navigate(DASHBOARD_ROUTE, Default::default());
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-100">
            <form class="bg-white shadow rounded-xl p-8 w-full max-w-md space-y-4" on:submit=on_submit>
                <h1 class="text-2xl font-bold text-center">"Crear cuenta"</h1>
                <ErrorBanner />
                <div class="grid grid-cols-2 gap-4">
                    <TextInput label="Nombre" value=first_name />
                    <TextInput label="Apellido" value=last_name />
                </div>
                <TextInput label="Correo electrónico" kind="email" value=email />
                <TextInput
                    label="Contraseña"
                    kind="password"
                    value=password
                    error=field_error("password")
                />
                <TextInput
                    label="Confirmar contraseña"
                    kind="password"
                    value=confirm_password
                    error=field_error("confirmPassword")
                />
                <button
                    type="submit"
                    class="w-full py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium disabled:opacity-50"
                    disabled=move || auth.state.with(|s| s.is_loading())
                >
                    "Registrarse"
                </button>
                <p class="text-sm text-center text-gray-500">
                    "¿Ya tienes cuenta? "
                    <A href=LOGIN_ROUTE class="text-blue-600 hover:underline">"Inicia sesión"</A>
                </p>
            </form>
        </div>
    }
}
