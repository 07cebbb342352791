use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    mailguard_server::rocket()
}
