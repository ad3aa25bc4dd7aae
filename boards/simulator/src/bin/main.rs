#[macro_use]
extern crate log;

use env_logger::Env;
use std::io::Read;

use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use async_std::sync::Mutex;
use balloon_compass::config::Config;
use balloon_compass::types::sensor::Magnetism;
use serde::Deserialize;
use simulator::{OrientationDegrees, Outcome, ReferenceCompass, Simulator};

type State = web::Data<Mutex<Simulator>>;

fn respond(outcome: Outcome) -> HttpResponse {
    match outcome {
        Some(Ok(reading)) => HttpResponse::Ok().json(reading),
        Some(Err(e)) => HttpResponse::UnprocessableEntity().body(e.to_string()),
        None => HttpResponse::Accepted().finish(),
    }
}

#[get("/heading")]
async fn get_heading(state: State) -> impl Responder {
    match state.lock().await.get_reading() {
        Some(reading) => HttpResponse::Ok().json(reading),
        None => HttpResponse::NotFound().finish(),
    }
}

#[get("/indicator")]
async fn get_indicator(state: State) -> impl Responder {
    let text = state.lock().await.render_indicator();
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text)
}

#[post("/sensors/magnetometer")]
async fn update_magnetism(state: State, magnetism: web::Json<Magnetism>) -> impl Responder {
    respond(state.lock().await.update_magnetism(*magnetism))
}

#[post("/sensors/orientation")]
async fn update_orientation(
    state: State,
    orientation: web::Json<OrientationDegrees>,
) -> impl Responder {
    respond(state.lock().await.update_orientation(*orientation))
}

#[post("/sensors/compass")]
async fn update_reference(state: State, reference: web::Json<ReferenceCompass>) -> impl Responder {
    state.lock().await.update_reference(*reference);
    HttpResponse::Ok()
}

#[get("/config")]
async fn get_config(state: State) -> impl Responder {
    HttpResponse::Ok().json(state.lock().await.config())
}

#[derive(Deserialize)]
struct Assignment {
    path: String,
    value: Option<String>,
}

#[post("/config")]
async fn set_config(state: State, assignment: web::Json<Assignment>) -> impl Responder {
    let mut simulator = state.lock().await;
    match simulator.set_config(&assignment.path, assignment.value.as_deref()) {
        Ok(()) => HttpResponse::Ok().json(simulator.config()),
        Err(e) => HttpResponse::BadRequest().body(format!("{}: {}", assignment.path, e)),
    }
}

fn load_config<'a>(matches: &'a clap::ArgMatches<'a>) -> Result<Config, String> {
    let mut config = match matches.value_of("config") {
        Some(path) => {
            let mut file = std::fs::File::open(path)
                .map_err(|e| format!("Read config file {} failed: {}", path, e))?;
            let mut buffer = String::new();
            file.read_to_string(&mut buffer).map_err(|_| "Unable to read config-file")?;
            serde_json::from_str(&buffer)
                .map_err(|e| format!("Malformed config file {}: {}", path, e))?
        }
        None => Config::default(),
    };
    config.validate().map_err(|e| format!("Invalid compass config: {}", e))?;
    for assignment in matches.values_of("set").into_iter().flatten() {
        config.assign(assignment).map_err(|e| format!("{}: {}", assignment, e))?;
    }
    Ok(config)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches = clap::App::new("simulator")
        .version("0.1")
        .author("qiuchengxuan")
        .about("Tilt compensated compass simulator")
        .arg(
            clap::Arg::with_name("listen")
                .short("l")
                .long("listen")
                .help("Listen address")
                .takes_value(true),
        )
        .arg(clap::Arg::with_name("config").long("config").help("Config file").takes_value(true))
        .arg(
            clap::Arg::with_name("set")
                .long("set")
                .help("Override config, e.g. compass.declination=3.5")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .get_matches();
    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(error) => {
            error!("{}", error);
            return Ok(());
        }
    };
    let state = web::Data::new(Mutex::new(Simulator::new(config)));
    let listen = matches.value_of("listen").unwrap_or("127.0.0.1:8080");
    info!("Start listening on {}", listen);
    let server = move || {
        App::new()
            .app_data(state.clone())
            .service(get_heading)
            .service(get_indicator)
            .service(update_magnetism)
            .service(update_orientation)
            .service(update_reference)
            .service(get_config)
            .service(set_config)
    };
    if listen.starts_with("/") {
        HttpServer::new(server).bind_uds(listen)?.run().await
    } else {
        HttpServer::new(server).bind(listen)?.run().await
    }
}
