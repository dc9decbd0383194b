//! Diagram construction from parsed requirements.
//!
//! Each section below conditionally contributes a handful of blocks and
//! edges: power distribution first (so rails exist before anything draws
//! power), then the processor (so every later section can hang off it), then
//! the optional subsystems. Section order is what guarantees every edge
//! points at an existing block.

use crate::model::{
    Block, Category, Connection, ConnectionKind, DIAGRAM_TYPE, DIAGRAM_VERSION, Diagram,
    Metadata, Position, PowerRail,
};
use crate::spec::{
    AnalogChain, Clocking, InterfaceRef, Memory, ParsedRequirements, PowerStage, PowerSystem,
    PrimaryComponents, RailRef, RailSpec, RfFrontend, StorageLogging, UserInterface,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

pub fn build_diagram(
    parsed: &ParsedRequirements,
    project: &str,
    system_type: &str,
    created: DateTime<Utc>,
) -> Diagram {
    let components = parsed.primary_components.clone().unwrap_or_default();
    let power = components.power_system.clone().unwrap_or_default();
    let rails = effective_rails(&power);

    let mut builder = DiagramBuilder::new(Metadata {
        project: project.to_string(),
        system_type: system_type.to_string(),
        created: created.to_rfc3339_opts(SecondsFormat::Millis, true),
        design_complexity: parsed.design_complexity().to_string(),
    });

    add_power_system(&mut builder, &power, &rails);
    let proc_id = add_processor(&mut builder, &components, &rails);

    if let Some(memory) = &components.memory {
        add_memory(&mut builder, memory, &proc_id);
    }
    add_interfaces(&mut builder, &components.interfaces_communication, &proc_id);
    if let Some(analog) = &components.analog_signal_chain {
        add_analog_chain(&mut builder, analog, &proc_id);
    }
    if let Some(stage) = &components.power_stage {
        add_power_stage(&mut builder, stage, &proc_id, system_type);
    }
    if let Some(rf) = &components.rf_frontend {
        add_rf_frontend(&mut builder, rf, &proc_id);
    }
    if let Some(clocking) = &components.clocking {
        add_clocking(&mut builder, clocking, &proc_id);
    }
    if let Some(ui) = &components.user_interface {
        add_user_interface(&mut builder, ui, &proc_id);
    }
    if let Some(storage) = &components.storage_logging {
        add_storage(&mut builder, storage, &proc_id);
    }

    builder.diagram
}

/// Rails from the requirements, or a single default 3.3V rail when none were
/// listed so the diagram always has a power tree.
fn effective_rails(power: &PowerSystem) -> Vec<RailRef> {
    if power.rails_needed.is_empty() {
        vec![RailRef::Spec(RailSpec {
            voltage: Some("3.3V".to_string()),
            current: None,
            purpose: Some("main".to_string()),
        })]
    } else {
        power.rails_needed.clone()
    }
}

struct DiagramBuilder {
    diagram: Diagram,
    next_id: u32,

    /// Regulator block id per rail voltage, for later power hookups.
    rails: BTreeMap<String, String>,

    /// Protection block id, when one was inserted; rails draw from it instead
    /// of the raw input.
    protected_input: Option<String>,
}

impl DiagramBuilder {
    fn new(metadata: Metadata) -> Self {
        DiagramBuilder {
            diagram: Diagram {
                version: DIAGRAM_VERSION.to_string(),
                kind: DIAGRAM_TYPE.to_string(),
                metadata,
                blocks: Vec::new(),
                connections: Vec::new(),
                power_tree: Vec::new(),
                signal_domains: Vec::new(),
            },
            next_id: 1,
            rails: BTreeMap::new(),
            protected_input: None,
        }
    }

    fn add_block(
        &mut self,
        kind: &str,
        label: impl Into<String>,
        category: Category,
        x: i32,
        y: i32,
    ) -> String {
        let id = format!("B{}", self.next_id);
        self.next_id += 1;
        self.diagram.blocks.push(Block {
            id: id.clone(),
            kind: kind.to_string(),
            label: label.into(),
            category,
            position: Position { x, y },
        });
        id
    }

    fn connect(&mut self, from: &str, to: &str, label: &str, kind: ConnectionKind) {
        self.diagram.connections.push(Connection {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
            kind,
        });
    }
}

fn add_power_system(builder: &mut DiagramBuilder, power: &PowerSystem, rails: &[RailRef]) {
    let input_voltage = power.input_voltage.as_deref().unwrap_or("12V");

    let input_id = builder.add_block(
        "power_input",
        format!("Input {}", input_voltage),
        Category::Power,
        100,
        100,
    );

    if !power.protection.is_empty() {
        let prot_id =
            builder.add_block("protection", "Protection Circuit", Category::Power, 250, 100);
        builder.connect(&input_id, &prot_id, input_voltage, ConnectionKind::Power);
        builder.protected_input = Some(prot_id);
    }

    let source = builder
        .protected_input
        .clone()
        .unwrap_or_else(|| input_id.clone());

    for (i, rail) in rails.iter().enumerate() {
        let voltage = rail.voltage();
        let i = i as i32;

        let rail_id = builder.add_block(
            "power_regulator",
            format!("{} @ {}", voltage, rail.current()),
            Category::Power,
            100 + (i % 3) * 120,
            200 + (i / 3) * 80,
        );
        builder.connect(&source, &rail_id, input_voltage, ConnectionKind::Power);

        builder.rails.insert(voltage.to_string(), rail_id.clone());
        builder.diagram.power_tree.push(PowerRail {
            rail: voltage.to_string(),
            regulator_id: rail_id,
            purpose: rail.purpose().to_string(),
            current: rail.current().to_string(),
        });
    }
}

fn add_processor(
    builder: &mut DiagramBuilder,
    components: &PrimaryComponents,
    rails: &[RailRef],
) -> String {
    let proc = components.processor.clone().unwrap_or_default();
    let label = proc
        .specific_part
        .or(proc.kind)
        .unwrap_or_else(|| "MCU".to_string());

    let proc_id = builder.add_block("processor", label, Category::Processing, 500, 300);

    if let Some(core_rail) = rails.iter().find(|r| r.powers_core()) {
        let voltage = core_rail.voltage();
        if let Some(rail_id) = builder.rails.get(voltage).cloned() {
            builder.connect(&rail_id, &proc_id, voltage, ConnectionKind::Power);
        }
    }

    proc_id
}

fn add_memory(builder: &mut DiagramBuilder, memory: &Memory, proc_id: &str) {
    if let Some(ram_type) = memory.ram_type.as_deref().filter(|t| *t != "none") {
        let label = join_label(&[ram_type, memory.ram_size.as_deref().unwrap_or("")]);
        let ram_id = builder.add_block("memory", label, Category::Memory, 700, 250);
        builder.connect(proc_id, &ram_id, "DDR Interface", ConnectionKind::Data);

        // DDR4 runs at 1.2V, older generations at 1.5V; only wire the rail if
        // the power tree actually has it.
        let ram_voltage = if ram_type.contains("DDR4") { "1.2V" } else { "1.5V" };
        if let Some(rail_id) = builder.rails.get(ram_voltage).cloned() {
            builder.connect(&rail_id, &ram_id, ram_voltage, ConnectionKind::Power);
        }
    }

    if let Some(flash_type) = memory.flash_type.as_deref() {
        let label = join_label(&[flash_type, "Flash", memory.flash_size.as_deref().unwrap_or("")]);
        let flash_id = builder.add_block("memory", label, Category::Memory, 700, 350);

        let bus = if flash_type.contains("QSPI") { "QSPI" } else { "SPI" };
        builder.connect(proc_id, &flash_id, bus, ConnectionKind::Data);
    }
}

fn add_interfaces(builder: &mut DiagramBuilder, interfaces: &[InterfaceRef], proc_id: &str) {
    for (i, iface) in interfaces.iter().enumerate() {
        let kind = iface.kind();
        let y = 150 + i as i32 * 70;

        let label = join_label(&[kind, iface.speed().as_deref().unwrap_or("")]);
        let iface_id = builder.add_block("interface", label, Category::Communication, 800, y);
        builder.connect(proc_id, &iface_id, kind, ConnectionKind::Data);

        // Interfaces with an external physical layer get a PHY + connector.
        if matches!(kind, "Ethernet" | "USB" | "CAN") {
            let phy_id = builder.add_block(
                "phy",
                format!("{} PHY", kind),
                Category::Communication,
                950,
                y,
            );
            builder.connect(
                &iface_id,
                &phy_id,
                &format!("{} signals", kind),
                ConnectionKind::Signal,
            );

            let port_id =
                builder.add_block("connector", format!("{} Port", kind), Category::External, 1100, y);
            builder.connect(&phy_id, &port_id, "Physical", ConnectionKind::Signal);
        }
    }
}

fn add_analog_chain(builder: &mut DiagramBuilder, analog: &AnalogChain, proc_id: &str) {
    if let Some(adc) = &analog.adc {
        let label = join_label(&[adc.resolution.as_deref().unwrap_or(""), "ADC"]);
        let adc_id = builder.add_block("adc", label, Category::Analog, 350, 450);
        builder.connect(&adc_id, proc_id, "SPI/I2C", ConnectionKind::Data);

        for (i, sensor) in analog.sensors.iter().enumerate() {
            let y = 450 + i as i32 * 60;
            let label = join_label(&[sensor.kind.as_deref().unwrap_or(""), "Sensor"]);
            let sensor_id = builder.add_block("sensor", label, Category::Sensing, 150, y);

            if !analog.amplifiers.is_empty() {
                let amp_id =
                    builder.add_block("amplifier", "Signal Conditioning", Category::Analog, 250, y);
                builder.connect(&sensor_id, &amp_id, "Analog", ConnectionKind::Analog);
                builder.connect(&amp_id, &adc_id, "Conditioned", ConnectionKind::Analog);
            } else {
                builder.connect(&sensor_id, &adc_id, "Analog", ConnectionKind::Analog);
            }
        }
    }

    if let Some(dac) = &analog.dac {
        let label = join_label(&[dac.resolution.as_deref().unwrap_or(""), "DAC"]);
        let dac_id = builder.add_block("dac", label, Category::Analog, 650, 450);
        builder.connect(proc_id, &dac_id, "SPI/I2C", ConnectionKind::Data);
    }
}

fn add_power_stage(
    builder: &mut DiagramBuilder,
    stage: &PowerStage,
    proc_id: &str,
    system_type: &str,
) {
    let Some(switches) = stage.switches.as_ref().filter(|_| stage.relevant_for.is_some())
    else {
        return;
    };

    let channels = stage
        .gate_drivers
        .as_ref()
        .and_then(|gd| gd.channels.as_ref())
        .map(ToString::to_string)
        .unwrap_or_else(|| "6".to_string());

    let gate_id = builder.add_block(
        "gate_driver",
        format!("Gate Driver ({}ch)", channels),
        Category::PowerStage,
        400,
        600,
    );
    builder.connect(proc_id, &gate_id, "PWM Signals", ConnectionKind::Signal);

    let switch_kind = switches.kind.as_deref().unwrap_or("MOSFET");
    let rating = switches.voltage_rating.as_deref().unwrap_or("TBD");
    let switch_id = builder.add_block(
        "power_switch",
        format!("{} ({})", switch_kind, rating),
        Category::PowerStage,
        550,
        600,
    );
    builder.connect(&gate_id, &switch_id, "Gate Drive", ConnectionKind::Signal);

    let output_id = builder.add_block(
        "output_stage",
        stage.output_stage.as_deref().unwrap_or("3-Phase Output"),
        Category::PowerStage,
        700,
        600,
    );
    builder.connect(&switch_id, &output_id, "Switched Power", ConnectionKind::Power);

    let load_label = if system_type.contains("Motor") {
        "3-Phase Motor"
    } else {
        "Load"
    };
    let load_id = builder.add_block("load", load_label, Category::External, 850, 600);
    builder.connect(&output_id, &load_id, "Output Power", ConnectionKind::Power);

    // Current feedback to the controller closes the control loop.
    let sense_id =
        builder.add_block("current_sensor", "Current Sensing", Category::Sensing, 700, 700);
    builder.connect(&output_id, &sense_id, "Current", ConnectionKind::Analog);
    builder.connect(&sense_id, proc_id, "Feedback", ConnectionKind::Analog);
}

fn add_rf_frontend(builder: &mut DiagramBuilder, rf: &RfFrontend, proc_id: &str) {
    if rf.relevant_for.is_none() || rf.components.is_empty() {
        return;
    }

    let (rf_x, rf_y) = (400, 150);

    // Components chain left to right. A component connects from whatever
    // block was inserted just before it, which is the previous component's
    // matching network when one exists.
    let mut prev_id: Option<String> = None;

    for (i, comp) in rf.components.iter().enumerate() {
        let mut label = comp.kind.clone().unwrap_or_default();
        if let Some(gain) = &comp.gain {
            label.push_str(&format!(" ({})", gain));
        }

        let comp_id =
            builder.add_block("rf_component", label, Category::Rf, rf_x + i as i32 * 120, rf_y);

        match &prev_id {
            None => builder.connect(proc_id, &comp_id, "Control", ConnectionKind::Signal),
            Some(prev) => builder.connect(prev, &comp_id, "RF Signal", ConnectionKind::Rf),
        }
        prev_id = Some(comp_id.clone());

        if rf.matching_networks.len() > i {
            let match_id = builder.add_block(
                "matching_network",
                "Matching Network",
                Category::Rf,
                rf_x + i as i32 * 120,
                rf_y + 60,
            );
            builder.connect(&comp_id, &match_id, "50Ω", ConnectionKind::Rf);
            prev_id = Some(match_id);
        }
    }

    let antenna_id = builder.add_block(
        "antenna",
        "Antenna",
        Category::External,
        rf_x + rf.components.len() as i32 * 120,
        rf_y,
    );
    if let Some(prev) = &prev_id {
        builder.connect(prev, &antenna_id, "RF Out", ConnectionKind::Rf);
    }
}

fn add_clocking(builder: &mut DiagramBuilder, clocking: &Clocking, proc_id: &str) {
    if let Some(clock) = &clocking.primary_clock {
        let frequency = clock
            .frequency
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let label = join_label(&[&frequency, clock.source.as_deref().unwrap_or("")]);

        let clock_id = builder.add_block("clock", label, Category::Timing, 350, 250);
        builder.connect(&clock_id, proc_id, "Clock", ConnectionKind::Signal);
    }
}

fn add_user_interface(builder: &mut DiagramBuilder, ui: &UserInterface, proc_id: &str) {
    if let Some(display) = &ui.display {
        if display.kind.as_deref() != Some("none") {
            let label = join_label(&[display.kind.as_deref().unwrap_or(""), "Display"]);
            let display_id = builder.add_block("display", label, Category::Ui, 650, 150);
            builder.connect(proc_id, &display_id, "Display Interface", ConnectionKind::Data);
        }
    }

    if !ui.input.is_empty() {
        let input_id = builder.add_block("user_input", ui.input.join(", "), Category::Ui, 650, 100);
        builder.connect(&input_id, proc_id, "User Input", ConnectionKind::Signal);
    }
}

fn add_storage(builder: &mut DiagramBuilder, storage: &StorageLogging, proc_id: &str) {
    if storage.sd_card.as_deref() == Some("yes") {
        let sd_id = builder.add_block("storage", "SD Card", Category::Storage, 750, 400);
        builder.connect(proc_id, &sd_id, "SD/SDIO", ConnectionKind::Data);
    }

    if let Some(eeprom) = &storage.eeprom {
        let size = eeprom
            .size
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let eeprom_id =
            builder.add_block("storage", join_label(&["EEPROM", &size]), Category::Storage, 750, 450);
        builder.connect(
            proc_id,
            &eeprom_id,
            eeprom.interface.as_deref().unwrap_or("I2C"),
            ConnectionKind::Data,
        );
    }
}

/// Join non-empty parts with single spaces; keeps labels clean when optional
/// fields like sizes or speeds are absent.
fn join_label(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
