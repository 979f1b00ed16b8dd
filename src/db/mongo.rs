use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

/// Build the shared MongoDB client and verify it can reach `database`,
/// the same database a `MongoDocumentStore` will be pointed at.
pub async fn create_mongo_client(uri: &str, database: &str) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);
    client_options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // A failed ping is reported but not fatal; the deployment may still
    // come up before the first real query.
    match client
        .database(database)
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Successfully connected to MongoDB ({})", database),
        Err(e) => eprintln!("WARNING: Connected to MongoDB but ping to {} failed: {}", database, e),
    }

    Arc::new(client)
}
