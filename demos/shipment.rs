//! Shipment Lifecycle
//!
//! This example drives a shipment from draft to cancellation.
//!
//! Key concepts:
//! - Substates (labels and QR codes are shipping documents)
//! - Inherited transitions (cancellation is declared once per group)
//! - Transition observers (every move is logged through `tracing`)
//! - DOT export of the configuration
//!
//! Run with: cargo run --example shipment

use substate::builder::{ConfigError, ConfigurationBuilder};
use substate::graph::to_dot;
use substate::machine::{StateMachine, TracingObserver};
use substate::{state_enum, trigger_enum};

state_enum! {
    enum Shipment {
        Draft,
        Initialized,
        CustomsInvoiceCreated,
        Manifested,
        CollectionScheduled,
        ShippingDocsCreated,
        LabelsCreated,
        QrCodeCreated,
        CustomerDocs,
        ReceiptCreated,
        DocumentPackCreated,
        CombinedDocumentCreated,
        CollectionBooked,
        CollectionCancelled,
        CancellationCompleted,
    }
}

trigger_enum! {
    enum Request {
        ProcessingRequested,
        InvoiceGenerationRequested,
        ManifestationRequested,
        CollectionScheduleRequested,
        CollectionBookingRequested,
        CollectionCancellationRequested,
        LabelGenerationRequested,
        QrCodeGenerationRequested,
        ReceiptGenerationRequested,
        DocumentsPackRequested,
        CombinedDocumentRequested,
        ShipmentCancellationRequested,
    }
}

fn configure(builder: &mut ConfigurationBuilder<Shipment, Request>) -> Result<(), ConfigError> {
    use Request::*;
    use Shipment::*;

    builder
        .permit(Draft, ProcessingRequested, Initialized)?
        .permit(Initialized, InvoiceGenerationRequested, CustomsInvoiceCreated)?
        .permit(CustomsInvoiceCreated, ManifestationRequested, Manifested)?
        .permit(Manifested, CollectionScheduleRequested, CollectionScheduled)?
        .permit(CollectionScheduled, LabelGenerationRequested, LabelsCreated)?
        .permit(CollectionScheduled, QrCodeGenerationRequested, QrCodeCreated)?;

    for docs in [LabelsCreated, QrCodeCreated] {
        builder
            .configure(docs)
            .substate_of(ShippingDocsCreated)?
            .permit(ReceiptGenerationRequested, ReceiptCreated)?;
    }

    builder
        .configure(ReceiptCreated)
        .substate_of(CustomerDocs)?
        .permit(DocumentsPackRequested, DocumentPackCreated)?;
    builder
        .configure(DocumentPackCreated)
        .substate_of(CustomerDocs)?
        .permit(CombinedDocumentRequested, CombinedDocumentCreated)?;
    builder
        .configure(CombinedDocumentCreated)
        .substate_of(CustomerDocs)?
        .permit(CollectionBookingRequested, CollectionBooked)?;
    builder.permit(
        CollectionBooked,
        CollectionCancellationRequested,
        CollectionCancelled,
    )?;

    for cancellable in [
        Manifested,
        CollectionScheduled,
        ShippingDocsCreated,
        CustomerDocs,
        CollectionBooked,
        CollectionCancelled,
    ] {
        builder.permit(
            cancellable,
            ShipmentCancellationRequested,
            CancellationCompleted,
        )?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Shipment Lifecycle ===\n");

    let mut builder = ConfigurationBuilder::new();
    configure(&mut builder)?;
    let config = builder.build()?;

    let mut shipment = StateMachine::new(config.clone(), Shipment::Draft);
    shipment.add_observer(TracingObserver);

    let requests = [
        Request::ProcessingRequested,
        Request::InvoiceGenerationRequested,
        Request::ManifestationRequested,
        Request::CollectionScheduleRequested,
        Request::LabelGenerationRequested,
        Request::ReceiptGenerationRequested,
        Request::DocumentsPackRequested,
        Request::CombinedDocumentRequested,
        Request::CollectionBookingRequested,
        Request::CollectionCancellationRequested,
        Request::ShipmentCancellationRequested,
    ];

    for request in requests {
        let state = shipment.fire(request)?;
        println!("{:?} -> {:?}", request, state);
    }

    // A cancelled shipment accepts nothing further.
    if let Err(error) = shipment.fire(Request::ProcessingRequested) {
        println!("\nRejected: {}", error);
    }

    println!("\nVisited {} states", shipment.history().get_path().len());
    println!("\n{}", to_dot(&config));

    Ok(())
}
