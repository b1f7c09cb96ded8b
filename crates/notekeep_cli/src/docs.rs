//! OpenAPI description of the notes HTTP API, served at `/docs`.

use serde_json::{json, Value};

pub fn openapi_document(server_url: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Notes API",
            "version": notekeep_core::core_version(),
            "description": "API documentation for the Notes service"
        },
        "servers": [{ "url": server_url }],
        "components": { "schemas": { "Note": note_schema() } },
        "paths": {
            "/": { "get": index_operation() },
            "/notes": { "get": list_operation() },
            "/notes/{name}": {
                "get": get_operation(),
                "put": update_operation(),
                "delete": delete_operation()
            },
            "/write": { "post": write_operation() }
        }
    })
}

fn note_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "text"],
        "properties": {
            "name": { "type": "string" },
            "text": { "type": "string" }
        }
    })
}

fn name_parameter() -> Value {
    json!({
        "in": "path",
        "name": "name",
        "required": true,
        "schema": { "type": "string" },
        "description": "Name of the note"
    })
}

fn text_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "text/plain": { "schema": { "type": "string" } } }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn index_operation() -> Value {
    json!({
        "description": "Serve the upload form",
        "responses": {
            "200": { "description": "HTML form", "content": { "text/html": {} } }
        }
    })
}

fn list_operation() -> Value {
    let notes = json!({ "type": "array", "items": { "$ref": "#/components/schemas/Note" } });
    json!({
        "description": "Get all notes",
        "responses": { "200": json_response("List of notes", notes) }
    })
}

fn get_operation() -> Value {
    let note = json!({ "$ref": "#/components/schemas/Note" });
    json!({
        "description": "Get a note by name",
        "parameters": [name_parameter()],
        "responses": {
            "200": json_response("Note", note),
            "404": text_response("Note not found")
        }
    })
}

fn update_operation() -> Value {
    let body = json!({
        "type": "object",
        "required": ["content"],
        "properties": { "content": { "type": "string" } }
    });
    json!({
        "description": "Update a note by name",
        "parameters": [name_parameter()],
        "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": body } }
        },
        "responses": {
            "200": text_response("Note updated"),
            "404": text_response("Note not found"),
            "500": text_response("Note store could not be written")
        }
    })
}

fn delete_operation() -> Value {
    json!({
        "description": "Delete a note by name",
        "parameters": [name_parameter()],
        "responses": {
            "200": text_response("Note deleted"),
            "404": text_response("Note not found"),
            "500": text_response("Note store could not be written")
        }
    })
}

fn write_operation() -> Value {
    let form = json!({
        "type": "object",
        "required": ["note_name"],
        "properties": {
            "note_name": { "type": "string" },
            "note": { "type": "string" }
        }
    });
    json!({
        "description": "Create a new note",
        "requestBody": {
            "required": true,
            "content": {
                "application/x-www-form-urlencoded": { "schema": form.clone() },
                "multipart/form-data": { "schema": form }
            }
        },
        "responses": {
            "201": text_response("Note saved"),
            "400": text_response("Note name is empty or missing"),
            "409": text_response("Note already exists"),
            "500": text_response("Note store could not be written")
        }
    })
}
