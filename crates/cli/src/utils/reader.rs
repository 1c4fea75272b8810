use scout_apdu_transport_pcsc::{
    ConnectStrategy, PcscConfig, PcscDeviceManager, PcscError, PcscTransport,
};

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("No readers found!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        match reader.atr() {
            Some(atr) => println!("{}. {} (ATR {})", i + 1, reader.name(), hex::encode_upper(atr)),
            None => println!("{}. {} (no card)", i + 1, reader.name()),
        }
    }

    Ok(())
}

/// Connection strategy for the reader options given on the command line
pub fn strategy(reader: Option<&str>, atr: Option<Vec<u8>>) -> ConnectStrategy {
    match (reader, atr) {
        (Some(name), _) => ConnectStrategy::Reader(name.to_string()),
        (None, Some(atr)) => ConnectStrategy::CardWithAtr(atr, None),
        (None, None) => ConnectStrategy::AnyCard,
    }
}

/// Connect to the reader selected by the command line options
pub fn connect(
    manager: &PcscDeviceManager,
    reader: Option<&str>,
    atr: Option<Vec<u8>>,
    config: PcscConfig,
) -> Result<PcscTransport, PcscError> {
    manager.connect_strategy(strategy(reader, atr), config)
}
