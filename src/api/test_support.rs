use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use chrono::NaiveTime;
use serde_json::Value;

use crate::{
    model::{
        department::{Department, DepartmentInput},
        employee::{Employee, EmployeeInput},
    },
    repository::{DepartmentRepository, EmployeeRepository, Store, memory::MemoryStore},
    routes,
};

/// Registers the store and every API route under `/api`, the way `main` does.
pub fn mount(store: Arc<MemoryStore>) -> impl FnOnce(&mut web::ServiceConfig) {
    let store: Arc<dyn Store> = store;
    move |cfg| {
        cfg.app_data(web::Data::from(store));
        routes::configure(cfg, "/api");
    }
}

/// Sends `req` and decodes the JSON body; an empty body comes back as `Null`.
pub async fn call_json<S, R, B, E>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    E: std::fmt::Debug,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };
    (status, body)
}

fn hms(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M:%S").expect("threshold must be HH:MM:SS")
}

pub async fn seed_department(
    store: &MemoryStore,
    name: &str,
    max_clock_in: &str,
    max_clock_out: &str,
) -> Department {
    let input = DepartmentInput {
        department_name: name.to_string(),
        max_clock_in_time: hms(max_clock_in),
        max_clock_out_time: hms(max_clock_out),
    };
    store
        .insert_department(&input)
        .await
        .expect("seed department")
}

pub async fn seed_employee(
    store: &MemoryStore,
    code: &str,
    department_id: u64,
    name: &str,
) -> Employee {
    let input = EmployeeInput {
        department_id,
        name: name.to_string(),
        address: format!("{} street 1", name),
    };
    store
        .insert_employee(code, &input)
        .await
        .expect("seed employee")
}
