//! The fixed table manifest.
//!
//! Order matters: parents are declared before the tables that reference
//! them, with one exception. `Checkpoints` references `ModelStations`
//! two positions before it is created; SQLite resolves foreign-key
//! targets lazily, so the creation order still holds.

use super::TableDef;

/// Number of tables provisioned on first run.
pub const TABLE_COUNT: usize = 25;

/// Every table of the SQGS local schema, in creation order.
pub static ALL_TABLES: [TableDef; TABLE_COUNT] = [
    TableDef {
        name: "Settings",
        create_sql: "CREATE TABLE IF NOT EXISTS Settings (
            key_name VARCHAR(45) PRIMARY KEY,
            key_value VARCHAR(600)
        )",
    },
    TableDef {
        name: "UpdatedTables",
        create_sql: "CREATE TABLE IF NOT EXISTS UpdatedTables (
            name VARCHAR(60) PRIMARY KEY,
            last_modified_date DATETIME
        )",
    },
    TableDef {
        name: "Plants",
        create_sql: "CREATE TABLE IF NOT EXISTS Plants (
            id INT PRIMARY KEY,
            plant_name VARCHAR(100) NOT NULL
        )",
    },
    TableDef {
        name: "Cells",
        create_sql: "CREATE TABLE IF NOT EXISTS Cells (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            plants INT NOT NULL,
            FOREIGN KEY(plants) REFERENCES Plants(id)
        )",
    },
    TableDef {
        name: "Stations",
        create_sql: "CREATE TABLE IF NOT EXISTS Stations (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            cells INT NOT NULL,
            is_sick BOOLEAN,
            is_approve BOOLEAN,
            printer VARCHAR(300),
            sap_identifier VARCHAR(30),
            station_approver BOOLEAN,
            sick_consider BOOLEAN,
            DSN_consider BOOLEAN,
            FOREIGN KEY(cells) REFERENCES Cells(id)
        )",
    },
    TableDef {
        name: "Shifts",
        create_sql: "CREATE TABLE IF NOT EXISTS Shifts (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            plants INT NOT NULL,
            FOREIGN KEY(plants) REFERENCES Plants(id)
        )",
    },
    TableDef {
        name: "Roles",
        create_sql: "CREATE TABLE IF NOT EXISTS Roles (
            id INT PRIMARY KEY,
            description VARCHAR(100) NOT NULL
        )",
    },
    TableDef {
        name: "SkillLevel",
        create_sql: "CREATE TABLE IF NOT EXISTS SkillLevel (
            id INT PRIMARY KEY,
            description VARCHAR(60) NOT NULL
        )",
    },
    TableDef {
        name: "Users",
        create_sql: "CREATE TABLE IF NOT EXISTS Users (
            id INT PRIMARY KEY,
            plants INT NOT NULL,
            user_code VARCHAR(50) UNIQUE NOT NULL,
            name VARCHAR(100) NOT NULL,
            roles INT NOT NULL,
            is_active BOOLEAN NOT NULL,
            is_loggedin BOOLEAN NOT NULL,
            FOREIGN KEY(plants) REFERENCES Plants(id),
            FOREIGN KEY(roles) REFERENCES Roles(id)
        )",
    },
    // stations/users hold serialized ID lists, see schema::idlist
    TableDef {
        name: "Stages",
        create_sql: "CREATE TABLE IF NOT EXISTS Stages (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            stations TEXT NOT NULL,
            users TEXT NOT NULL
        )",
    },
    TableDef {
        name: "StageUser",
        create_sql: "CREATE TABLE IF NOT EXISTS StageUser (
            id INT PRIMARY KEY,
            stages INT NOT NULL,
            users INT NOT NULL,
            shift INT NOT NULL,
            skill_level INT NOT NULL,
            FOREIGN KEY(stages) REFERENCES Stages(id),
            FOREIGN KEY(users) REFERENCES Users(id),
            FOREIGN KEY(shift) REFERENCES Shifts(id),
            FOREIGN KEY(skill_level) REFERENCES SkillLevel(id)
        )",
    },
    TableDef {
        name: "UserDeployment",
        create_sql: "CREATE TABLE IF NOT EXISTS UserDeployment (
            id VARCHAR(50) PRIMARY KEY,
            user_log INT NOT NULL,
            stage INT NOT NULL,
            users TEXT NOT NULL,
            is_updated BOOLEAN,
            FOREIGN KEY(stage) REFERENCES Stages(id)
        )",
    },
    TableDef {
        name: "InspectionTypes",
        create_sql: "CREATE TABLE IF NOT EXISTS InspectionTypes (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL
        )",
    },
    TableDef {
        name: "DefectCategories",
        create_sql: "CREATE TABLE IF NOT EXISTS DefectCategories (
            id INT PRIMARY KEY,
            description VARCHAR(60) NOT NULL
        )",
    },
    TableDef {
        name: "SourceGates",
        create_sql: "CREATE TABLE IF NOT EXISTS SourceGates (
            id INT PRIMARY KEY,
            description VARCHAR(60) NOT NULL
        )",
    },
    TableDef {
        name: "Repairs",
        create_sql: "CREATE TABLE IF NOT EXISTS Repairs (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            checklist TEXT
        )",
    },
    TableDef {
        name: "Defects",
        create_sql: "CREATE TABLE IF NOT EXISTS Defects (
            id INT PRIMARY KEY,
            description VARCHAR(300) NOT NULL,
            defectcategories INT NOT NULL,
            sourcegates INT NOT NULL,
            repairs TEXT NOT NULL,
            FOREIGN KEY(defectcategories) REFERENCES DefectCategories(id),
            FOREIGN KEY(sourcegates) REFERENCES SourceGates(id)
        )",
    },
    TableDef {
        name: "Parts",
        create_sql: "CREATE TABLE IF NOT EXISTS Parts (
            id INT PRIMARY KEY,
            description VARCHAR(45) NOT NULL,
            defects TEXT NOT NULL,
            is_active BOOLEAN NOT NULL,
            image TEXT,
            stages INT NOT NULL
        )",
    },
    TableDef {
        name: "Images",
        create_sql: "CREATE TABLE IF NOT EXISTS Images (
            id INT PRIMARY KEY,
            description VARCHAR(250) NOT NULL,
            image_path TEXT NOT NULL,
            parts TEXT
        )",
    },
    TableDef {
        name: "Checkpoints",
        create_sql: "CREATE TABLE IF NOT EXISTS Checkpoints (
            id INT PRIMARY KEY,
            description VARCHAR(250) NOT NULL,
            inspectiontypes INT NOT NULL,
            modelstations INT NOT NULL,
            parts INT NOT NULL,
            defects INT NOT NULL,
            is_new BOOLEAN NOT NULL,
            checkpoint_order INT NOT NULL,
            is_active BOOLEAN NOT NULL,
            FOREIGN KEY(inspectiontypes) REFERENCES InspectionTypes(id),
            FOREIGN KEY(modelstations) REFERENCES ModelStations(id),
            FOREIGN KEY(parts) REFERENCES Parts(id),
            FOREIGN KEY(defects) REFERENCES Defects(id)
        )",
    },
    TableDef {
        name: "Models",
        create_sql: "CREATE TABLE IF NOT EXISTS Models (
            id INT PRIMARY KEY,
            sales_code VARCHAR(100) NOT NULL,
            description VARCHAR(300) NOT NULL,
            parts TEXT NOT NULL,
            is_active BOOLEAN
        )",
    },
    TableDef {
        name: "ModelStations",
        create_sql: "CREATE TABLE IF NOT EXISTS ModelStations (
            id INT PRIMARY KEY,
            model INT NOT NULL,
            station INT NOT NULL,
            station_order INT NOT NULL,
            station_group INT NOT NULL,
            is_rolldown BOOLEAN NOT NULL,
            is_final BOOLEAN NOT NULL,
            d2_rolldown BOOLEAN NOT NULL,
            is_approval BOOLEAN,
            FOREIGN KEY(model) REFERENCES Models(id),
            FOREIGN KEY(station) REFERENCES Stations(id)
        )",
    },
    TableDef {
        name: "SickAggregate",
        create_sql: "CREATE TABLE IF NOT EXISTS SickAggregate (
            id INT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            plant INT NOT NULL,
            FOREIGN KEY(plant) REFERENCES Plants(id)
        )",
    },
    TableDef {
        name: "SickCheckpoints",
        create_sql: "CREATE TABLE IF NOT EXISTS SickCheckpoints (
            id INT PRIMARY KEY,
            description VARCHAR(250) NOT NULL,
            sickaggregate INT NOT NULL,
            parts INT NOT NULL,
            defects INT NOT NULL,
            responsibility INT NOT NULL,
            FOREIGN KEY(sickaggregate) REFERENCES SickAggregate(id),
            FOREIGN KEY(parts) REFERENCES Parts(id),
            FOREIGN KEY(defects) REFERENCES Defects(id),
            FOREIGN KEY(responsibility) REFERENCES Roles(id)
        )",
    },
    TableDef {
        name: "DefectDetails",
        create_sql: "CREATE TABLE IF NOT EXISTS DefectDetails (
            id VARCHAR(100) PRIMARY KEY,
            defect INT NOT NULL,
            stations INT NOT NULL,
            users INT NOT NULL,
            defect_type INT NOT NULL,
            responsibility INT NOT NULL,
            additional TEXT NOT NULL,
            create_date DATETIME NOT NULL,
            closed_date DATETIME,
            is_closed BOOLEAN,
            repairs TEXT NOT NULL,
            is_dsu BOOLEAN,
            FOREIGN KEY(defect) REFERENCES Defects(id),
            FOREIGN KEY(stations) REFERENCES Stations(id),
            FOREIGN KEY(users) REFERENCES Users(id),
            FOREIGN KEY(defect_type) REFERENCES InspectionTypes(id),
            FOREIGN KEY(responsibility) REFERENCES Roles(id)
        )",
    },
];
